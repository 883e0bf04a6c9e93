//! Observatorio de Aguas 共享数据模型
//!
//! 前端与后端 REST API 之间的线上格式（字段名与后端响应保持一致，
//! 均为西班牙语命名），以及纯粹的客户端逻辑：
//! - `level`: 污染/生物多样性的固定序数词汇表
//! - `filter`: 按类型过滤水体列表
//! - `stats`: 数据面板的聚合统计
//!
//! 后端的时间戳为不带时区偏移的 UTC（FastAPI 的 `datetime.utcnow()`），
//! 因此统一使用 `NaiveDateTime`。

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

mod filter;
mod level;
mod stats;

pub use filter::{WaterBodyFilter, WaterBodyKind, filter_water_bodies};
pub use level::Level;
pub use stats::DashboardStats;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_ANALISTA: &str = "analista";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 水体监测记录
///
/// `tipo`、`contaminacion`、`biodiversidad` 在线上是自由字符串
/// （如 "Río"、"Medio-Alto"），分类与排序逻辑见 [`WaterBodyKind`] 和 [`Level`]。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterBody {
    pub id: i64,
    pub nombre: String,
    pub tipo: String,
    pub latitud: f64,
    pub longitud: f64,
    pub contaminacion: String,
    pub biodiversidad: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub temperatura: Option<f64>,
    #[serde(default)]
    pub ph: Option<f64>,
    #[serde(default)]
    pub oxigeno_disuelto: Option<f64>,
    #[serde(default)]
    pub fecha_actualizacion: Option<NaiveDateTime>,
}

/// 创建水体的请求体
///
/// 未填写的可选字段必须整体缺省（而不是 0 或空串），
/// 交由后端决定默认值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWaterBodyRequest {
    pub nombre: String,
    pub tipo: String,
    pub latitud: f64,
    pub longitud: f64,
    pub contaminacion: String,
    pub biodiversidad: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperatura: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oxigeno_disuelto: Option<f64>,
}

/// 当前用户（`GET /auth/me`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl User {
    /// 是否展示"注册水体"入口
    ///
    /// 仅是界面层面的便利判断，真正的授权校验在服务端。
    pub fn can_create_water_bodies(&self) -> bool {
        self.role
            .as_deref()
            .is_some_and(|r| r == ROLE_ADMIN || r == ROLE_ANALISTA)
    }
}

/// 注册新账号的请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// 登录成功返回的 bearer 令牌
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

// =========================================================
// 只读辅助资源 (Auxiliary Resources)
// =========================================================
//
// 以下记录按原样取列表并展示，客户端不做校验或变换。

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: i64,
    pub nombre: String,
    pub tipo: String,
    pub cuerpo_agua_id: i64,
    #[serde(default)]
    pub latitud: Option<f64>,
    #[serde(default)]
    pub longitud: Option<f64>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub instalado_en: Option<NaiveDate>,
    #[serde(default)]
    pub activo: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: i64,
    pub nombre: String,
    pub unidad: String,
    #[serde(default)]
    pub valor_minimo: Option<f64>,
    #[serde(default)]
    pub valor_maximo: Option<f64>,
    #[serde(default)]
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: i64,
    pub sensor_id: i64,
    pub parametro_id: i64,
    pub cuerpo_agua_id: i64,
    pub valor: f64,
    pub unidad: String,
    #[serde(default)]
    pub tomado_en: Option<NaiveDateTime>,
    #[serde(default)]
    pub observaciones: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub cuerpo_agua_id: i64,
    #[serde(default)]
    pub lectura_id: Option<i64>,
    #[serde(default)]
    pub parametro_id: Option<i64>,
    pub nivel: String,
    pub mensaje: String,
    #[serde(default)]
    pub creada_en: Option<NaiveDateTime>,
    #[serde(default)]
    pub resuelta: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectedZone {
    pub id: i64,
    pub cuerpo_agua_id: i64,
    pub nombre: String,
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub area_km2: Option<f64>,
    #[serde(default)]
    pub estado: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub cuerpo_agua_id: i64,
    #[serde(default)]
    pub usuario_id: Option<i64>,
    pub titulo: String,
    pub contenido: String,
    #[serde(default)]
    pub formato: String,
    #[serde(default)]
    pub generado_en: Option<NaiveDateTime>,
}

/// 用户收藏（需认证）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: i64,
    pub usuario_id: i64,
    pub cuerpo_agua_id: i64,
    #[serde(default)]
    pub creado_en: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFavoriteRequest {
    pub cuerpo_agua_id: i64,
}

/// 服务端聚合统计（`GET /estadisticas`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estadisticas {
    pub total_cuerpos_agua: u64,
    pub total_sensores: u64,
    pub total_alertas: u64,
    pub total_parametros: u64,
    #[serde(default)]
    pub ultima_actualizacion: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_body_json() -> &'static str {
        r#"{
            "id": 7,
            "nombre": "Río Test",
            "tipo": "Río",
            "latitud": 4.6,
            "longitud": -74.1,
            "contaminacion": "Baja",
            "biodiversidad": "Alta",
            "descripcion": null,
            "temperatura": null,
            "ph": 7.2,
            "oxigeno_disuelto": null
        }"#
    }

    #[test]
    fn water_body_deserializes_without_timestamp() {
        let cuerpo: WaterBody = serde_json::from_str(sample_body_json()).unwrap();
        assert_eq!(cuerpo.nombre, "Río Test");
        assert_eq!(cuerpo.latitud, 4.6);
        assert_eq!(cuerpo.ph, Some(7.2));
        assert!(cuerpo.fecha_actualizacion.is_none());
    }

    #[test]
    fn water_body_parses_naive_timestamp() {
        // FastAPI 输出不带偏移的 ISO 时间戳
        let json = r#"{
            "id": 1, "nombre": "Lago Azul", "tipo": "Lago",
            "latitud": 0.0, "longitud": 0.0,
            "contaminacion": "Medio", "biodiversidad": "Media",
            "fecha_actualizacion": "2026-08-25T12:30:45.123456"
        }"#;
        let cuerpo: WaterBody = serde_json::from_str(json).unwrap();
        let fecha = cuerpo.fecha_actualizacion.unwrap();
        assert_eq!(fecha.date().to_string(), "2026-08-25");
    }

    #[test]
    fn create_request_omits_unset_optionals() {
        let req = CreateWaterBodyRequest {
            nombre: "Río Test".into(),
            tipo: "Río".into(),
            latitud: 4.6,
            longitud: -74.1,
            contaminacion: "Baja".into(),
            biodiversidad: "Alta".into(),
            descripcion: None,
            temperatura: None,
            ph: Some(6.8),
            oxigeno_disuelto: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        let obj = json.as_object().unwrap();
        // 未填写的可选字段必须整体缺省，而不是 null、0 或空串
        assert!(!obj.contains_key("temperatura"));
        assert!(!obj.contains_key("oxigeno_disuelto"));
        assert!(!obj.contains_key("descripcion"));
        assert_eq!(obj["ph"], 6.8);
    }

    #[test]
    fn role_gates_create_affordance() {
        let mut user = User {
            id: 1,
            email: "ana@example.com".into(),
            full_name: "Ana".into(),
            role: Some("analista".into()),
            created_at: None,
        };
        assert!(user.can_create_water_bodies());
        user.role = Some("admin".into());
        assert!(user.can_create_water_bodies());
        user.role = Some("visualizador".into());
        assert!(!user.can_create_water_bodies());
        user.role = None;
        assert!(!user.can_create_water_bodies());
    }

    #[test]
    fn token_type_defaults_to_bearer() {
        let token: TokenResponse = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(token.token_type, "bearer");
    }
}
