//! Wire types of the Discipulado REST resources.
//!
//! Field names mirror the upstream API verbatim (it speaks Spanish), so
//! everything here round-trips through serde untouched.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

fn default_activo() -> bool {
    true
}

/// Role carried by user accounts and identity claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rol {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "FACILITADOR")]
    Facilitador,
}

/// Weekday a class schedule runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dia {
    #[serde(rename = "MIE")]
    Miercoles,
    #[serde(rename = "DOM")]
    Domingo,
}

/// Attendance outcome for one student in one class session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoAsistencia {
    #[serde(rename = "A")]
    Asistio,
    #[serde(rename = "F")]
    Falto,
    #[serde(rename = "R")]
    Recupero,
    /// Attended ahead of schedule, in a different class schedule.
    #[serde(rename = "D")]
    Adelanto,
}

/// A course run, e.g. "Discipulado 2025 - Semestre 1".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Curso {
    pub id: i64,
    pub nombre: String,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub activo: bool,
}

/// One of the fixed weekly schedules of a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Horario {
    pub id: i64,
    pub curso: i64,
    pub dia: Dia,
    pub hora: NaiveTime,
    #[serde(default = "default_activo")]
    pub activo: bool,
}

/// A facilitator's table within a schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesa {
    pub id: i64,
    pub horario: i64,
    pub facilitador: i64,
    #[serde(default)]
    pub nombre_mesa: String,
    #[serde(default = "default_activo")]
    pub activo: bool,
}

/// An enrolled student. `mesa` is `None` when the table was dissolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alumno {
    pub id: i64,
    pub mesa: Option<i64>,
    pub nombres: String,
    pub apellidos: String,
    pub fecha_nacimiento: NaiveDate,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub colonia: String,
    #[serde(default)]
    pub calle: String,
    #[serde(default)]
    pub numero_casa: String,
    pub activo: bool,
}

impl Alumno {
    pub fn nombre_completo(&self) -> String {
        format!("{} {}", self.nombres, self.apellidos)
    }
}

/// Attendance record, unique per (alumno, numero_clase).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asistencia {
    pub id: i64,
    pub alumno: i64,
    /// Class session number, 1 to 23.
    pub numero_clase: u8,
    pub estado: EstadoAsistencia,
    #[serde(default)]
    pub motivo_falta_recupero: Option<String>,
    /// Schedule the student attended ahead in, for `Adelanto`.
    #[serde(default)]
    pub horario_adelanto: Option<i64>,
}

/// A facilitator or administrator account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usuario {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub role: Rol,
}

// ---- write payloads (id is always server-assigned) ----

#[derive(Debug, Clone, Serialize)]
pub struct CursoPayload {
    pub nombre: String,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub activo: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HorarioPayload {
    pub curso: i64,
    pub dia: Dia,
    pub hora: NaiveTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct MesaPayload {
    pub horario: i64,
    pub facilitador: i64,
    pub nombre_mesa: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlumnoPayload {
    pub mesa: Option<i64>,
    pub nombres: String,
    pub apellidos: String,
    pub fecha_nacimiento: NaiveDate,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub telefono: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub colonia: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub calle: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub numero_casa: String,
    pub activo: bool,
}

/// One row of the attendance sheet sent to `asistencias/bulk_upsert/`.
/// The server matches on (alumno, numero_clase) and updates in place.
#[derive(Debug, Clone, Serialize)]
pub struct AsistenciaUpsert {
    pub alumno: i64,
    pub numero_clase: u8,
    pub estado: EstadoAsistencia,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motivo_falta_recupero: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horario_adelanto: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsuarioPayload {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Rol,
    pub password: String,
}

// ---- dashboard aggregates ----
// The aggregation endpoint returns rows keyed by the ORM's lookup paths;
// the serde renames keep that detail off the public surface.

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardStats {
    pub numero_clase_consultada: u8,
    pub faltas_por_horario: Vec<FaltasPorHorario>,
    /// Per-table breakdown by state; empty for facilitators.
    pub detalle_por_mesa: Vec<DetalleMesa>,
    pub conteo_general: Vec<ConteoEstado>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaltasPorHorario {
    #[serde(rename = "alumno__mesa__horario__dia")]
    pub dia: Dia,
    #[serde(rename = "alumno__mesa__horario__hora")]
    pub hora: NaiveTime,
    pub total_faltas: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetalleMesa {
    #[serde(rename = "alumno__mesa__nombre_mesa")]
    pub nombre_mesa: String,
    #[serde(rename = "alumno__mesa__facilitador__first_name")]
    pub facilitador: String,
    #[serde(rename = "alumno__mesa_id")]
    pub mesa_id: i64,
    pub estado: EstadoAsistencia,
    pub total: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConteoEstado {
    pub estado: EstadoAsistencia,
    pub total: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alumno_deserializes_with_null_mesa_and_missing_address() {
        let raw = r#"{
            "id": 12,
            "mesa": null,
            "nombres": "Juan Carlos",
            "apellidos": "Pérez",
            "fecha_nacimiento": "1998-11-06",
            "telefono": "",
            "activo": true
        }"#;

        let alumno: Alumno = serde_json::from_str(raw).unwrap();
        assert_eq!(alumno.mesa, None);
        assert_eq!(alumno.nombre_completo(), "Juan Carlos Pérez");
        assert_eq!(alumno.colonia, "");
    }

    #[test]
    fn horario_parses_time_with_seconds() {
        let raw = r#"{"id": 3, "curso": 1, "dia": "MIE", "hora": "19:00:00"}"#;
        let horario: Horario = serde_json::from_str(raw).unwrap();
        assert_eq!(horario.dia, Dia::Miercoles);
        assert_eq!(horario.hora.to_string(), "19:00:00");
        // Not present in older payloads; defaults to active.
        assert!(horario.activo);
    }

    #[test]
    fn estado_codes_round_trip() {
        for (code, estado) in [
            ("\"A\"", EstadoAsistencia::Asistio),
            ("\"F\"", EstadoAsistencia::Falto),
            ("\"R\"", EstadoAsistencia::Recupero),
            ("\"D\"", EstadoAsistencia::Adelanto),
        ] {
            let parsed: EstadoAsistencia = serde_json::from_str(code).unwrap();
            assert_eq!(parsed, estado);
            assert_eq!(serde_json::to_string(&estado).unwrap(), code);
        }
    }

    #[test]
    fn dashboard_rows_map_orm_lookup_keys() {
        let raw = r#"{
            "numero_clase_consultada": 5,
            "faltas_por_horario": [
                {"alumno__mesa__horario__dia": "DOM", "alumno__mesa__horario__hora": "09:00:00", "total_faltas": 4}
            ],
            "detalle_por_mesa": [
                {"alumno__mesa__nombre_mesa": "Mesa 1", "alumno__mesa__facilitador__first_name": "María", "alumno__mesa_id": 2, "estado": "A", "total": 9}
            ],
            "conteo_general": [
                {"estado": "A", "total": 40},
                {"estado": "F", "total": 6}
            ]
        }"#;

        let stats: DashboardStats = serde_json::from_str(raw).unwrap();
        assert_eq!(stats.numero_clase_consultada, 5);
        assert_eq!(stats.faltas_por_horario[0].dia, Dia::Domingo);
        assert_eq!(stats.detalle_por_mesa[0].mesa_id, 2);
        assert_eq!(stats.conteo_general.len(), 2);
    }

    #[test]
    fn upsert_omits_unset_optionals() {
        let row = AsistenciaUpsert {
            alumno: 12,
            numero_clase: 5,
            estado: EstadoAsistencia::Asistio,
            motivo_falta_recupero: None,
            horario_adelanto: None,
        };
        let raw = serde_json::to_value(&row).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({"alumno": 12, "numero_clase": 5, "estado": "A"})
        );
    }
}
