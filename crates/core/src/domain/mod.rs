pub mod parlamentario;
pub mod proyecto;
pub mod trayectoria;
pub mod votacion;

pub use parlamentario::{edad_en, ParlamentarioResumen, PerfilParlamentario};
pub use proyecto::{
    ProyectoAutor, ResumenActividad, ResumenComisiones, ResumenProyectos, INICIATIVA_MENSAJE,
    INICIATIVA_MOCION, RESULTADO_EN_TRAMITACION,
};
pub use trayectoria::{
    intervalo_activo, ComisionRegistro, EstadoMandato, EstadoMembresia, EstadoMilitancia,
    MandatoRegistro, MilitanciaRegistro, ROL_PRESIDENTE,
};
pub use votacion::{
    AlineacionVoto, AnalisisPartidario, EstadisticasVotacion, VotacionRegistro, Voto,
    RESULTADO_APROBADO, RESULTADO_RECHAZADO,
};
