pub mod m202608200001_create_users;
pub mod m202608200002_create_aprendices;
pub mod m202608200003_create_fichas;
pub mod m202608200004_create_ficha_aprendices;
pub mod m202608200005_create_asistencias;
pub mod m202608200006_create_asistencia_cambios;
pub mod m202608200007_create_anomalias;
pub mod m202608200008_create_qr_tokens;
pub mod m202608200009_create_turnos;
