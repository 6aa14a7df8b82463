//! Deterministic demo dataset.
//!
//! Two legislators sharing a party: Ana Pérez (the fully-featured profile
//! the end-to-end checks are written against) and Bruno Soto, a co-partisan
//! who shares exactly two vote sessions with her, agreeing on one. Loading
//! is idempotent so `seed` can run against an already-seeded database.

use sqlx::Row;

use crate::repositories::RepositoryError;
use crate::DbPool;

pub struct DemoDataset;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedSummary {
    pub parlamentarios: u64,
    pub sesiones: u64,
    pub votos: u64,
}

#[derive(Clone, Debug)]
pub struct VerificationReport {
    pub ok: bool,
    pub issues: Vec<String>,
}

const ANA_MP_UID: i64 = 1;
const BRUNO_MP_UID: i64 = 2;
const BILL_HUMEDALES: &str = "12345-07";

struct SesionSeed {
    id: i64,
    bill_id: Option<&'static str>,
    fecha: &'static str,
    tema: &'static str,
    resultado: &'static str,
}

struct VotoSeed {
    sesion_id: i64,
    mp_uid: i64,
    voto: &'static str,
}

const SESIONES: &[SesionSeed] = &[
    SesionSeed {
        id: 1,
        bill_id: Some(BILL_HUMEDALES),
        fecha: "2024-03-01",
        tema: "Protección de humedales urbanos, votación en general",
        resultado: "Aprobado",
    },
    SesionSeed {
        id: 2,
        bill_id: None,
        fecha: "2024-03-02",
        tema: "Modifica la jornada laboral",
        resultado: "Aprobado",
    },
    SesionSeed {
        id: 3,
        bill_id: None,
        fecha: "2024-03-03",
        tema: "Presupuesto regional",
        resultado: "Aprobado",
    },
    SesionSeed {
        id: 4,
        bill_id: None,
        fecha: "2024-03-04",
        tema: "Fondo de emergencia habitacional",
        resultado: "Aprobado",
    },
    SesionSeed {
        id: 5,
        bill_id: None,
        fecha: "2024-03-05",
        tema: "Reforma al sistema notarial",
        resultado: "Aprobado",
    },
    SesionSeed {
        id: 6,
        bill_id: None,
        fecha: "2024-03-06",
        tema: "Subsidio al transporte rural",
        resultado: "Aprobado",
    },
    SesionSeed {
        id: 7,
        bill_id: None,
        fecha: "2024-03-07",
        tema: "Royalty minero, votación en particular",
        resultado: "Aprobado",
    },
    SesionSeed {
        id: 8,
        bill_id: None,
        fecha: "2024-03-08",
        tema: "Rebaja de impuestos específicos",
        resultado: "Rechazado",
    },
    SesionSeed {
        id: 9,
        bill_id: None,
        fecha: "2024-03-09",
        tema: "Ampliación de zonas francas",
        resultado: "Aprobado",
    },
    SesionSeed {
        id: 10,
        bill_id: None,
        fecha: "2024-03-10",
        tema: "Acusación constitucional",
        resultado: "Aprobado",
    },
];

const VOTOS: &[VotoSeed] = &[
    VotoSeed { sesion_id: 1, mp_uid: ANA_MP_UID, voto: "A Favor" },
    VotoSeed { sesion_id: 2, mp_uid: ANA_MP_UID, voto: "A Favor" },
    VotoSeed { sesion_id: 3, mp_uid: ANA_MP_UID, voto: "A Favor" },
    VotoSeed { sesion_id: 4, mp_uid: ANA_MP_UID, voto: "A Favor" },
    VotoSeed { sesion_id: 5, mp_uid: ANA_MP_UID, voto: "A Favor" },
    VotoSeed { sesion_id: 6, mp_uid: ANA_MP_UID, voto: "A Favor" },
    VotoSeed { sesion_id: 7, mp_uid: ANA_MP_UID, voto: "A Favor" },
    VotoSeed { sesion_id: 8, mp_uid: ANA_MP_UID, voto: "En Contra" },
    VotoSeed { sesion_id: 9, mp_uid: ANA_MP_UID, voto: "En Contra" },
    VotoSeed { sesion_id: 10, mp_uid: ANA_MP_UID, voto: "Abstención" },
    // Bruno shares sessions 1 and 2: one agreement, one disagreement.
    VotoSeed { sesion_id: 1, mp_uid: BRUNO_MP_UID, voto: "A Favor" },
    VotoSeed { sesion_id: 2, mp_uid: BRUNO_MP_UID, voto: "En Contra" },
];

impl DemoDataset {
    pub async fn load(pool: &DbPool) -> Result<SeedSummary, RepositoryError> {
        sqlx::query(
            "INSERT OR IGNORE INTO dim_parlamentario
                 (mp_uid, nombre_completo, genero, fecha_nacimiento, lugar_nacimiento,
                  profesion, fecha_extraccion)
             VALUES (?, 'Ana Pérez', 'Femenino', '1980-06-15', 'Valparaíso',
                     'Abogada', '2025-06-01')",
        )
        .bind(ANA_MP_UID)
        .execute(pool)
        .await?;

        sqlx::query(
            "INSERT OR IGNORE INTO dim_parlamentario
                 (mp_uid, nombre_completo, genero, profesion, fecha_extraccion)
             VALUES (?, 'Bruno Soto', 'Masculino', 'Profesor', '2025-06-01')",
        )
        .bind(BRUNO_MP_UID)
        .execute(pool)
        .await?;

        sqlx::query(
            "INSERT OR IGNORE INTO dim_partidos (partido_id, nombre_partido, sigla)
             VALUES (1, 'Partido Celeste', 'PC')",
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "INSERT OR IGNORE INTO militancia_historial
                 (militancia_id, mp_uid, partido_id, fecha_inicio, fecha_fin)
             VALUES (1, ?, 1, '2015-01-01', NULL), (2, ?, 1, '2017-05-01', NULL)",
        )
        .bind(ANA_MP_UID)
        .bind(BRUNO_MP_UID)
        .execute(pool)
        .await?;

        sqlx::query(
            "INSERT OR IGNORE INTO parlamentario_mandatos
                 (mandato_id, mp_uid, cargo, distrito, fecha_inicio, fecha_fin)
             VALUES (1, ?, 'Diputada', '5', '2018-03-11', '2022-03-10'),
                    (2, ?, 'Diputada', '5', '2022-03-11', NULL),
                    (3, ?, 'Diputado', '12', '2022-03-11', NULL)",
        )
        .bind(ANA_MP_UID)
        .bind(ANA_MP_UID)
        .bind(BRUNO_MP_UID)
        .execute(pool)
        .await?;

        // Ana deliberately has no committee memberships.
        sqlx::query(
            "INSERT OR IGNORE INTO dim_comisiones (comision_id, nombre_comision, tipo)
             VALUES (1, 'Comisión de Hacienda', 'Permanente')",
        )
        .execute(pool)
        .await?;
        sqlx::query(
            "INSERT OR IGNORE INTO comision_membresias
                 (membresia_id, mp_uid, comision_id, rol, fecha_inicio, fecha_fin)
             VALUES (1, ?, 1, 'Presidente', '2022-04-01', NULL)",
        )
        .bind(BRUNO_MP_UID)
        .execute(pool)
        .await?;

        sqlx::query(
            "INSERT OR IGNORE INTO bills
                 (bill_id, titulo, resumen, fecha_ingreso, etapa, iniciativa, origen,
                  urgencia, resultado_final, ley_numero, ley_fecha_publicacion)
             VALUES (?, 'Fortalece la protección de los humedales urbanos',
                     'Incorpora criterios de protección ambiental en planes reguladores',
                     '2023-04-12', 'Tramitación terminada', 'Moción', 'Cámara de Diputados',
                     'Simple', 'Publicado', '21.555', '2024-01-20')",
        )
        .bind(BILL_HUMEDALES)
        .execute(pool)
        .await?;
        sqlx::query("INSERT OR IGNORE INTO bill_authors (bill_id, mp_uid) VALUES (?, ?)")
            .bind(BILL_HUMEDALES)
            .bind(ANA_MP_UID)
            .execute(pool)
            .await?;

        for sesion in SESIONES {
            sqlx::query(
                "INSERT OR IGNORE INTO sesiones_votacion
                     (sesion_votacion_id, bill_id, fecha, tema, resultado_general,
                      quorum_aplicado)
                 VALUES (?, ?, ?, ?, ?, 'Quórum simple')",
            )
            .bind(sesion.id)
            .bind(sesion.bill_id)
            .bind(sesion.fecha)
            .bind(sesion.tema)
            .bind(sesion.resultado)
            .execute(pool)
            .await?;
        }

        for voto in VOTOS {
            sqlx::query(
                "INSERT OR IGNORE INTO votos_parlamentario (sesion_votacion_id, mp_uid, voto)
                 VALUES (?, ?, ?)",
            )
            .bind(voto.sesion_id)
            .bind(voto.mp_uid)
            .bind(voto.voto)
            .execute(pool)
            .await?;
        }

        Ok(SeedSummary {
            parlamentarios: 2,
            sesiones: SESIONES.len() as u64,
            votos: VOTOS.len() as u64,
        })
    }

    pub async fn verify(pool: &DbPool) -> Result<VerificationReport, RepositoryError> {
        let mut issues = Vec::new();

        let parlamentarios = count(pool, "SELECT COUNT(*) AS count FROM dim_parlamentario").await?;
        if parlamentarios < 2 {
            issues.push(format!("expected at least 2 legislators, found {parlamentarios}"));
        }

        let votos_ana =
            count(pool, "SELECT COUNT(*) AS count FROM votos_parlamentario WHERE mp_uid = 1")
                .await?;
        if votos_ana != 10 {
            issues.push(format!("expected 10 votes for mp_uid=1, found {votos_ana}"));
        }

        let leyes = count(
            pool,
            "SELECT COUNT(*) AS count FROM bills WHERE ley_numero IS NOT NULL",
        )
        .await?;
        if leyes < 1 {
            issues.push("expected at least one enacted bill".to_string());
        }

        let sesiones_compartidas = count(
            pool,
            "SELECT COUNT(DISTINCT v1.sesion_votacion_id) AS count
             FROM votos_parlamentario v1
             JOIN votos_parlamentario v2
               ON v1.sesion_votacion_id = v2.sesion_votacion_id
             WHERE v1.mp_uid = 1 AND v2.mp_uid = 2",
        )
        .await?;
        if sesiones_compartidas != 2 {
            issues.push(format!("expected 2 shared sessions, found {sesiones_compartidas}"));
        }

        Ok(VerificationReport { ok: issues.is_empty(), issues })
    }
}

async fn count(pool: &DbPool, sql: &str) -> Result<i64, RepositoryError> {
    let row = sqlx::query(sql).fetch_one(pool).await?;
    Ok(row.try_get("count")?)
}

#[cfg(test)]
mod tests {
    use crate::repositories::{ParlamentarioStore, SqlParlamentarioStore};
    use crate::{connect_with_settings, migrations};

    use super::DemoDataset;

    #[tokio::test]
    async fn load_es_idempotente_y_verificable() {
        let pool = connect_with_settings("sqlite:file:fixtures_idem?mode=memory&cache=shared", 1, 30)
            .await
            .expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");

        let primero = DemoDataset::load(&pool).await.expect("first load");
        let segundo = DemoDataset::load(&pool).await.expect("second load");
        assert_eq!(primero, segundo);

        let reporte = DemoDataset::verify(&pool).await.expect("verify");
        assert!(reporte.ok, "verification issues: {:?}", reporte.issues);
        pool.close().await;
    }

    #[tokio::test]
    async fn bruno_preside_hacienda() {
        let pool = connect_with_settings("sqlite:file:fixtures_bruno?mode=memory&cache=shared", 1, 30)
            .await
            .expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        DemoDataset::load(&pool).await.expect("load");

        let store = SqlParlamentarioStore::new(pool.clone());
        let comisiones = store.comisiones(2).await.expect("query comisiones");
        assert_eq!(comisiones.len(), 1);
        assert_eq!(comisiones[0].nombre_comision, "Comisión de Hacienda");
        assert_eq!(comisiones[0].rol, "Presidente");

        let resumen = store.resumen_comisiones(2).await.expect("query resumen");
        assert_eq!(resumen.total_comisiones, 1);
        assert_eq!(resumen.presidencias, 1);
        assert_eq!(resumen.comisiones_activas, 1);
        pool.close().await;
    }
}
