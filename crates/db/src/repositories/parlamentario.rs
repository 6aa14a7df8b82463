use async_trait::async_trait;
use parlatwin_core::chrono::NaiveDate;
use parlatwin_core::domain::parlamentario::{ParlamentarioResumen, PerfilParlamentario};
use parlatwin_core::domain::proyecto::{
    ProyectoAutor, ResumenComisiones, ResumenProyectos, INICIATIVA_MENSAJE, INICIATIVA_MOCION,
    RESULTADO_EN_TRAMITACION,
};
use parlatwin_core::domain::trayectoria::{
    ComisionRegistro, MandatoRegistro, MilitanciaRegistro, ROL_PRESIDENTE,
};
use parlatwin_core::domain::votacion::{
    AnalisisPartidario, EstadisticasVotacion, VotacionRegistro, Voto,
};
use sqlx::{sqlite::SqliteRow, Row};

use super::{ParlamentarioStore, RepositoryError};
use crate::DbPool;

pub struct SqlParlamentarioStore {
    pool: DbPool,
}

impl SqlParlamentarioStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParlamentarioStore for SqlParlamentarioStore {
    async fn perfil(&self, mp_uid: i64) -> Result<Option<PerfilParlamentario>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT
                mp_uid, nombre_completo, genero, fecha_nacimiento, lugar_nacimiento,
                profesion, diputadoid, bcn_uri, url_foto, twitter_handle,
                sitio_web_personal
            FROM dim_parlamentario
            WHERE mp_uid = ?
            "#,
        )
        .bind(mp_uid)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|value| perfil_from_row(&value)).transpose()
    }

    async fn mandatos(&self, mp_uid: i64) -> Result<Vec<MandatoRegistro>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT mandato_id, cargo, distrito, fecha_inicio, fecha_fin
            FROM parlamentario_mandatos
            WHERE mp_uid = ?
            ORDER BY fecha_inicio DESC, mandato_id DESC
            "#,
        )
        .bind(mp_uid)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(mandato_from_row).collect()
    }

    async fn militancias(&self, mp_uid: i64) -> Result<Vec<MilitanciaRegistro>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT mh.militancia_id, p.nombre_partido, p.sigla, mh.fecha_inicio, mh.fecha_fin
            FROM militancia_historial mh
            JOIN dim_partidos p ON mh.partido_id = p.partido_id
            WHERE mh.mp_uid = ?
            ORDER BY mh.fecha_inicio DESC, mh.militancia_id DESC
            "#,
        )
        .bind(mp_uid)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(militancia_from_row).collect()
    }

    async fn comisiones(&self, mp_uid: i64) -> Result<Vec<ComisionRegistro>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT c.nombre_comision, c.tipo AS tipo_comision, cm.rol,
                   cm.fecha_inicio, cm.fecha_fin
            FROM comision_membresias cm
            JOIN dim_comisiones c ON cm.comision_id = c.comision_id
            WHERE cm.mp_uid = ?
            ORDER BY cm.fecha_inicio DESC, cm.membresia_id DESC
            "#,
        )
        .bind(mp_uid)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(comision_from_row).collect()
    }

    async fn proyectos_autor(&self, mp_uid: i64) -> Result<Vec<ProyectoAutor>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                b.bill_id, b.titulo, b.resumen, b.fecha_ingreso, b.etapa, b.iniciativa,
                b.origen, b.urgencia, b.resultado_final, b.ley_numero,
                b.ley_fecha_publicacion,
                (SELECT COUNT(*) - 1 FROM bill_authors WHERE bill_id = b.bill_id)
                    AS num_coautores
            FROM bills b
            JOIN bill_authors ba ON b.bill_id = ba.bill_id
            WHERE ba.mp_uid = ?
            ORDER BY b.fecha_ingreso DESC, b.bill_id DESC
            "#,
        )
        .bind(mp_uid)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(proyecto_from_row).collect()
    }

    async fn resumen_proyectos(&self, mp_uid: i64) -> Result<ResumenProyectos, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_proyectos,
                COALESCE(SUM(CASE WHEN b.ley_numero IS NOT NULL THEN 1 ELSE 0 END), 0)
                    AS proyectos_ley,
                COALESCE(SUM(CASE WHEN b.resultado_final = ? THEN 1 ELSE 0 END), 0)
                    AS en_tramitacion,
                COALESCE(SUM(CASE WHEN b.iniciativa = ? THEN 1 ELSE 0 END), 0) AS mociones,
                COALESCE(SUM(CASE WHEN b.iniciativa = ? THEN 1 ELSE 0 END), 0) AS mensajes
            FROM bills b
            JOIN bill_authors ba ON b.bill_id = ba.bill_id
            WHERE ba.mp_uid = ?
            "#,
        )
        .bind(RESULTADO_EN_TRAMITACION)
        .bind(INICIATIVA_MOCION)
        .bind(INICIATIVA_MENSAJE)
        .bind(mp_uid)
        .fetch_one(&self.pool)
        .await?;

        Ok(ResumenProyectos {
            total_proyectos: row.try_get("total_proyectos")?,
            proyectos_ley: row.try_get("proyectos_ley")?,
            en_tramitacion: row.try_get("en_tramitacion")?,
            mociones: row.try_get("mociones")?,
            mensajes: row.try_get("mensajes")?,
        })
    }

    async fn resumen_comisiones(
        &self,
        mp_uid: i64,
    ) -> Result<ResumenComisiones, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(DISTINCT comision_id) AS total_comisiones,
                COALESCE(SUM(CASE WHEN rol = ? THEN 1 ELSE 0 END), 0) AS presidencias,
                COALESCE(SUM(CASE WHEN fecha_fin IS NULL THEN 1 ELSE 0 END), 0)
                    AS comisiones_activas
            FROM comision_membresias
            WHERE mp_uid = ?
            "#,
        )
        .bind(ROL_PRESIDENTE)
        .bind(mp_uid)
        .fetch_one(&self.pool)
        .await?;

        Ok(ResumenComisiones {
            total_comisiones: row.try_get("total_comisiones")?,
            presidencias: row.try_get("presidencias")?,
            comisiones_activas: row.try_get("comisiones_activas")?,
        })
    }

    async fn estadisticas_votacion(
        &self,
        mp_uid: i64,
    ) -> Result<EstadisticasVotacion, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(DISTINCT sesion_votacion_id) AS total_votaciones,
                COALESCE(SUM(CASE WHEN voto = ? THEN 1 ELSE 0 END), 0) AS votos_a_favor,
                COALESCE(SUM(CASE WHEN voto = ? THEN 1 ELSE 0 END), 0) AS votos_en_contra,
                COALESCE(SUM(CASE WHEN voto = ? THEN 1 ELSE 0 END), 0) AS abstenciones,
                COALESCE(SUM(CASE WHEN voto = ? THEN 1 ELSE 0 END), 0) AS pareos
            FROM votos_parlamentario
            WHERE mp_uid = ?
            "#,
        )
        .bind(Voto::AFavor.as_str())
        .bind(Voto::EnContra.as_str())
        .bind(Voto::Abstencion.as_str())
        .bind(Voto::Pareo.as_str())
        .bind(mp_uid)
        .fetch_one(&self.pool)
        .await?;

        Ok(EstadisticasVotacion {
            total_votaciones: row.try_get("total_votaciones")?,
            votos_a_favor: row.try_get("votos_a_favor")?,
            votos_en_contra: row.try_get("votos_en_contra")?,
            abstenciones: row.try_get("abstenciones")?,
            pareos: row.try_get("pareos")?,
        })
    }

    async fn votaciones_recientes(
        &self,
        mp_uid: i64,
        limite: u32,
    ) -> Result<Vec<VotacionRegistro>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                sv.sesion_votacion_id, sv.bill_id, sv.fecha, sv.tema,
                sv.resultado_general, sv.quorum_aplicado,
                b.titulo AS titulo_proyecto, vp.voto
            FROM votos_parlamentario vp
            JOIN sesiones_votacion sv
                ON vp.sesion_votacion_id = sv.sesion_votacion_id
            LEFT JOIN bills b ON sv.bill_id = b.bill_id
            WHERE vp.mp_uid = ?
            ORDER BY sv.fecha DESC, sv.sesion_votacion_id DESC
            LIMIT ?
            "#,
        )
        .bind(mp_uid)
        .bind(i64::from(limite))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(votacion_from_row).collect()
    }

    async fn analisis_partidario(
        &self,
        mp_uid: i64,
    ) -> Result<Option<AnalisisPartidario>, RepositoryError> {
        // Peers are restricted to the currently active party; without that
        // restriction historical co-memberships double-count sessions.
        let row = sqlx::query(
            r#"
            WITH partido_actual AS (
                SELECT p.partido_id, p.nombre_partido
                FROM militancia_historial mh
                JOIN dim_partidos p ON mh.partido_id = p.partido_id
                WHERE mh.mp_uid = ?
                  AND (mh.fecha_fin IS NULL OR mh.fecha_fin >= date('now'))
                ORDER BY mh.fecha_inicio DESC
                LIMIT 1
            ),
            companeros_partido AS (
                SELECT DISTINCT mh.mp_uid
                FROM militancia_historial mh
                JOIN partido_actual pa ON mh.partido_id = pa.partido_id
                WHERE (mh.fecha_fin IS NULL OR mh.fecha_fin >= date('now'))
                  AND mh.mp_uid != ?
            ),
            votaciones_compartidas AS (
                SELECT
                    vp1.sesion_votacion_id,
                    CASE WHEN vp1.voto = vp2.voto THEN 1 ELSE 0 END AS coincide
                FROM votos_parlamentario vp1
                JOIN votos_parlamentario vp2
                    ON vp1.sesion_votacion_id = vp2.sesion_votacion_id
                JOIN companeros_partido cp ON vp2.mp_uid = cp.mp_uid
                WHERE vp1.mp_uid = ?
            )
            SELECT
                pa.nombre_partido,
                COUNT(DISTINCT vc.sesion_votacion_id) AS votaciones_analizadas,
                AVG(vc.coincide) * 100 AS porcentaje_coincidencia,
                SUM(vc.coincide) AS votos_coincidentes,
                COUNT(*) AS total_comparaciones
            FROM votaciones_compartidas vc
            CROSS JOIN partido_actual pa
            GROUP BY pa.nombre_partido
            "#,
        )
        .bind(mp_uid)
        .bind(mp_uid)
        .bind(mp_uid)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|value| analisis_from_row(&value)).transpose()
    }

    async fn listar_parlamentarios(&self) -> Result<Vec<ParlamentarioResumen>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT mp_uid, nombre_completo
            FROM dim_parlamentario
            ORDER BY nombre_completo ASC, mp_uid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(ParlamentarioResumen {
                    mp_uid: row.try_get("mp_uid")?,
                    nombre_completo: row.try_get("nombre_completo")?,
                })
            })
            .collect()
    }
}

fn perfil_from_row(row: &SqliteRow) -> Result<PerfilParlamentario, RepositoryError> {
    Ok(PerfilParlamentario {
        mp_uid: row.try_get("mp_uid")?,
        nombre_completo: row.try_get("nombre_completo")?,
        genero: row.try_get("genero")?,
        fecha_nacimiento: parse_fecha_opt(
            "dim_parlamentario.fecha_nacimiento",
            row.try_get("fecha_nacimiento")?,
        )?,
        lugar_nacimiento: row.try_get("lugar_nacimiento")?,
        profesion: row.try_get("profesion")?,
        diputado_id: row.try_get("diputadoid")?,
        bcn_uri: row.try_get("bcn_uri")?,
        url_foto: row.try_get("url_foto")?,
        twitter_handle: row.try_get("twitter_handle")?,
        sitio_web_personal: row.try_get("sitio_web_personal")?,
    })
}

fn mandato_from_row(row: &SqliteRow) -> Result<MandatoRegistro, RepositoryError> {
    Ok(MandatoRegistro {
        mandato_id: row.try_get("mandato_id")?,
        cargo: row.try_get("cargo")?,
        distrito: row.try_get("distrito")?,
        fecha_inicio: parse_fecha(
            "parlamentario_mandatos.fecha_inicio",
            &row.try_get::<String, _>("fecha_inicio")?,
        )?,
        fecha_fin: parse_fecha_opt("parlamentario_mandatos.fecha_fin", row.try_get("fecha_fin")?)?,
    })
}

fn militancia_from_row(row: &SqliteRow) -> Result<MilitanciaRegistro, RepositoryError> {
    Ok(MilitanciaRegistro {
        militancia_id: row.try_get("militancia_id")?,
        nombre_partido: row.try_get("nombre_partido")?,
        sigla: row.try_get("sigla")?,
        fecha_inicio: parse_fecha(
            "militancia_historial.fecha_inicio",
            &row.try_get::<String, _>("fecha_inicio")?,
        )?,
        fecha_fin: parse_fecha_opt("militancia_historial.fecha_fin", row.try_get("fecha_fin")?)?,
    })
}

fn comision_from_row(row: &SqliteRow) -> Result<ComisionRegistro, RepositoryError> {
    Ok(ComisionRegistro {
        nombre_comision: row.try_get("nombre_comision")?,
        tipo_comision: row.try_get("tipo_comision")?,
        rol: row.try_get("rol")?,
        fecha_inicio: parse_fecha(
            "comision_membresias.fecha_inicio",
            &row.try_get::<String, _>("fecha_inicio")?,
        )?,
        fecha_fin: parse_fecha_opt("comision_membresias.fecha_fin", row.try_get("fecha_fin")?)?,
    })
}

fn proyecto_from_row(row: &SqliteRow) -> Result<ProyectoAutor, RepositoryError> {
    Ok(ProyectoAutor {
        bill_id: row.try_get("bill_id")?,
        titulo: row.try_get("titulo")?,
        resumen: row.try_get("resumen")?,
        fecha_ingreso: parse_fecha_opt("bills.fecha_ingreso", row.try_get("fecha_ingreso")?)?,
        etapa: row.try_get("etapa")?,
        iniciativa: row.try_get("iniciativa")?,
        origen: row.try_get("origen")?,
        urgencia: row.try_get("urgencia")?,
        resultado_final: row.try_get("resultado_final")?,
        ley_numero: row.try_get("ley_numero")?,
        ley_fecha_publicacion: parse_fecha_opt(
            "bills.ley_fecha_publicacion",
            row.try_get("ley_fecha_publicacion")?,
        )?,
        num_coautores: row.try_get("num_coautores")?,
    })
}

fn votacion_from_row(row: &SqliteRow) -> Result<VotacionRegistro, RepositoryError> {
    let voto_raw: String = row.try_get("voto")?;
    let voto = Voto::parse(&voto_raw).ok_or_else(|| {
        RepositoryError::Decode(format!("invalid votos_parlamentario.voto value: {voto_raw}"))
    })?;

    Ok(VotacionRegistro {
        sesion_votacion_id: row.try_get("sesion_votacion_id")?,
        bill_id: row.try_get("bill_id")?,
        fecha: parse_fecha("sesiones_votacion.fecha", &row.try_get::<String, _>("fecha")?)?,
        tema: row.try_get("tema")?,
        resultado_general: row.try_get("resultado_general")?,
        quorum_aplicado: row.try_get("quorum_aplicado")?,
        titulo_proyecto: row.try_get("titulo_proyecto")?,
        voto,
    })
}

fn analisis_from_row(row: &SqliteRow) -> Result<AnalisisPartidario, RepositoryError> {
    Ok(AnalisisPartidario {
        nombre_partido: row.try_get("nombre_partido")?,
        votaciones_analizadas: row.try_get("votaciones_analizadas")?,
        porcentaje_coincidencia: row.try_get("porcentaje_coincidencia")?,
        votos_coincidentes: row.try_get("votos_coincidentes")?,
        total_comparaciones: row.try_get("total_comparaciones")?,
    })
}

fn parse_fecha(campo: &str, valor: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(valor, "%Y-%m-%d").map_err(|error| {
        RepositoryError::Decode(format!("invalid {campo} date '{valor}': {error}"))
    })
}

fn parse_fecha_opt(
    campo: &str,
    valor: Option<String>,
) -> Result<Option<NaiveDate>, RepositoryError> {
    valor.as_deref().map(|fecha| parse_fecha(campo, fecha)).transpose()
}
