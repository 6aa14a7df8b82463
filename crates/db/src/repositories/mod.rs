use async_trait::async_trait;
use thiserror::Error;

use parlatwin_core::domain::parlamentario::{ParlamentarioResumen, PerfilParlamentario};
use parlatwin_core::domain::proyecto::{ProyectoAutor, ResumenComisiones, ResumenProyectos};
use parlatwin_core::domain::trayectoria::{ComisionRegistro, MandatoRegistro, MilitanciaRegistro};
use parlatwin_core::domain::votacion::{
    AnalisisPartidario, EstadisticasVotacion, VotacionRegistro,
};

pub mod memory;
pub mod parlamentario;

pub use memory::{InMemoryParlamentarioStore, ParlamentarioSeed};
pub use parlamentario::SqlParlamentarioStore;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Read interface the context aggregator depends on. Every listing comes
/// back newest-first; every aggregate coerces absent values to zero.
#[async_trait]
pub trait ParlamentarioStore: Send + Sync {
    async fn perfil(&self, mp_uid: i64) -> Result<Option<PerfilParlamentario>, RepositoryError>;

    async fn mandatos(&self, mp_uid: i64) -> Result<Vec<MandatoRegistro>, RepositoryError>;

    async fn militancias(&self, mp_uid: i64) -> Result<Vec<MilitanciaRegistro>, RepositoryError>;

    async fn comisiones(&self, mp_uid: i64) -> Result<Vec<ComisionRegistro>, RepositoryError>;

    async fn proyectos_autor(&self, mp_uid: i64) -> Result<Vec<ProyectoAutor>, RepositoryError>;

    async fn resumen_proyectos(&self, mp_uid: i64) -> Result<ResumenProyectos, RepositoryError>;

    async fn resumen_comisiones(&self, mp_uid: i64)
        -> Result<ResumenComisiones, RepositoryError>;

    async fn estadisticas_votacion(
        &self,
        mp_uid: i64,
    ) -> Result<EstadisticasVotacion, RepositoryError>;

    async fn votaciones_recientes(
        &self,
        mp_uid: i64,
        limite: u32,
    ) -> Result<Vec<VotacionRegistro>, RepositoryError>;

    async fn analisis_partidario(
        &self,
        mp_uid: i64,
    ) -> Result<Option<AnalisisPartidario>, RepositoryError>;

    async fn listar_parlamentarios(&self) -> Result<Vec<ParlamentarioResumen>, RepositoryError>;
}
