pub mod anomalia;
pub mod aprendiz;
pub mod asistencia;
pub mod asistencia_cambio;
pub mod ficha;
pub mod ficha_aprendiz;
pub mod qr_token;
pub mod turno;
pub mod user;

pub use anomalia::Entity as Anomalia;
pub use aprendiz::Entity as Aprendiz;
pub use asistencia::Entity as Asistencia;
pub use asistencia_cambio::Entity as AsistenciaCambio;
pub use ficha::Entity as Ficha;
pub use ficha_aprendiz::Entity as FichaAprendiz;
pub use qr_token::Entity as QrToken;
pub use turno::Entity as Turno;
pub use user::Entity as User;
