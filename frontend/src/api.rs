//! REST API 客户端
//!
//! 封装对后端的所有出站 HTTP 调用。localStorage 中若存在令牌，
//! 每个请求都会附带 `Authorization: Bearer` 头（令牌的写入只发生在
//! `auth` 模块）。
//!
//! 错误分类见 [`ApiError`]：401 通过状态码识别，而不是错误类型。

use gloo_net::http::{Request, RequestBuilder, Response};
use observatorio_shared::{
    Alert, CreateFavoriteRequest, CreateWaterBodyRequest, Estadisticas, Favorite, Parameter,
    ProtectedZone, Reading, RegisterRequest, Report, Sensor, TokenResponse, User, WaterBody,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

const DEFAULT_API_URL: &str = "http://localhost:8000";

pub type ApiResult<T> = Result<T, ApiError>;

/// API 错误分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 网络/传输层失败
    Network(String),
    /// 后端返回非 2xx，携带服务端的 detail 文本
    Status { code: u16, detail: String },
    /// 请求体编码或响应体解析失败（本地编解码，非传输层）
    Parse(String),
}

// 构造请求体失败发生在本地，归类为编解码错误而不是网络错误
fn encode_error(e: impl core::fmt::Display) -> ApiError {
    ApiError::Parse(e.to_string())
}

impl ApiError {
    /// 受保护调用遇到 401 → 视为"未登录"
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { code: 401, .. })
    }
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "No se pudo contactar al servidor: {msg}"),
            ApiError::Status { detail, .. } => write!(f, "{detail}"),
            ApiError::Parse(msg) => write!(f, "Respuesta inválida del servidor: {msg}"),
        }
    }
}

/// 从 FastAPI 风格的错误响应体中提取 `detail`
///
/// `detail` 可能是字符串、带 `msg` 的对象，或校验错误列表
/// （各项的 `msg` 用 " | " 拼接）。缺失或无法解析时用 fallback。
fn error_detail(body: &str, fallback: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return fallback.to_string();
    };
    match value.get("detail") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        Some(serde_json::Value::Array(items)) => {
            let msgs: Vec<String> = items
                .iter()
                .map(|item| match item.get("msg").and_then(|m| m.as_str()) {
                    Some(msg) => msg.to_string(),
                    None => item.to_string(),
                })
                .collect();
            if msgs.is_empty() {
                fallback.to_string()
            } else {
                msgs.join(" | ")
            }
        }
        Some(serde_json::Value::Object(map)) => map
            .get("msg")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string()),
        _ => fallback.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservatorioApi {
    base_url: String,
}

impl ObservatorioApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// 从编译期环境变量 `OBSERVATORIO_API_URL` 读取后端地址，
    /// 未设置时退回本地默认值。
    pub fn from_env() -> Self {
        Self::new(option_env!("OBSERVATORIO_API_URL").unwrap_or(DEFAULT_API_URL))
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    // 附带认证头（如有令牌）
    fn with_auth(builder: RequestBuilder) -> RequestBuilder {
        match crate::auth::stored_token() {
            Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
            None => builder,
        }
    }

    async fn expect_json<T: DeserializeOwned>(res: Response, fallback: &str) -> ApiResult<T> {
        if !res.ok() {
            let code = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                code,
                detail: error_detail(&body, fallback),
            });
        }
        res.json::<T>().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> ApiResult<T> {
        let res = Self::with_auth(Request::get(&self.url(path)))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::expect_json(res, fallback).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> ApiResult<T> {
        let res = Self::with_auth(Request::post(&self.url(path)))
            .json(body)
            .map_err(encode_error)?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::expect_json(res, fallback).await
    }

    // =========================================================
    // 认证 (Auth)
    // =========================================================

    /// 注册新账号。注册本身不建立会话。
    pub async fn register(&self, req: &RegisterRequest) -> ApiResult<User> {
        self.post_json("/auth/register", req, "No se pudo completar el registro")
            .await
    }

    /// 登录。后端要求表单编码的 `username`（=email）与 `password`。
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<TokenResponse> {
        let body = format!(
            "username={}&password={}",
            js_sys::encode_uri_component(email),
            js_sys::encode_uri_component(password)
        );
        let res = Request::post(&self.url("/auth/login"))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .map_err(encode_error)?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::expect_json(res, "Credenciales inválidas").await
    }

    /// 当前用户（bearer 认证）
    pub async fn current_user(&self) -> ApiResult<User> {
        self.get_json("/auth/me", "No se pudo validar la sesión").await
    }

    // =========================================================
    // 水体 (Water Bodies)
    // =========================================================

    pub async fn water_bodies(&self) -> ApiResult<Vec<WaterBody>> {
        self.get_json("/cuerpos-agua", "No se pudieron cargar los cuerpos de agua")
            .await
    }

    pub async fn create_water_body(&self, req: &CreateWaterBodyRequest) -> ApiResult<WaterBody> {
        self.post_json(
            "/cuerpos-agua",
            req,
            "No se pudo registrar el cuerpo de agua",
        )
        .await
    }

    // 后端同样暴露 PUT/DELETE；当前没有组件使用它们
    #[allow(dead_code)]
    pub async fn update_water_body(
        &self,
        id: i64,
        req: &CreateWaterBodyRequest,
    ) -> ApiResult<WaterBody> {
        let res = Self::with_auth(Request::put(&self.url(&format!("/cuerpos-agua/{id}"))))
            .json(req)
            .map_err(encode_error)?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::expect_json(res, "No se pudo actualizar el cuerpo de agua").await
    }

    #[allow(dead_code)]
    pub async fn delete_water_body(&self, id: i64) -> ApiResult<()> {
        let res = Self::with_auth(Request::delete(&self.url(&format!("/cuerpos-agua/{id}"))))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if !res.ok() {
            let code = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                code,
                detail: error_detail(&body, "No se pudo eliminar el cuerpo de agua"),
            });
        }
        Ok(())
    }

    // =========================================================
    // 只读辅助资源 (Auxiliary Resources)
    // =========================================================

    pub async fn sensors(&self) -> ApiResult<Vec<Sensor>> {
        self.get_json("/sensores", "No se pudieron cargar los sensores").await
    }

    pub async fn parameters(&self) -> ApiResult<Vec<Parameter>> {
        self.get_json("/parametros", "No se pudieron cargar los parámetros")
            .await
    }

    pub async fn readings(&self) -> ApiResult<Vec<Reading>> {
        self.get_json("/lecturas", "No se pudieron cargar las lecturas").await
    }

    pub async fn alerts(&self) -> ApiResult<Vec<Alert>> {
        self.get_json("/alertas", "No se pudieron cargar las alertas").await
    }

    pub async fn protected_zones(&self) -> ApiResult<Vec<ProtectedZone>> {
        self.get_json(
            "/zonas-protegidas",
            "No se pudieron cargar las zonas protegidas",
        )
        .await
    }

    pub async fn reports(&self) -> ApiResult<Vec<Report>> {
        self.get_json("/reportes", "No se pudieron cargar los reportes").await
    }

    /// 当前用户的收藏（需认证）
    pub async fn favorites(&self) -> ApiResult<Vec<Favorite>> {
        self.get_json("/favoritos", "No se pudieron cargar los favoritos").await
    }

    pub async fn create_favorite(&self, cuerpo_agua_id: i64) -> ApiResult<Favorite> {
        self.post_json(
            "/favoritos",
            &CreateFavoriteRequest { cuerpo_agua_id },
            "No se pudo guardar el favorito",
        )
        .await
    }

    /// 服务端聚合统计
    pub async fn estadisticas(&self) -> ApiResult<Estadisticas> {
        self.get_json("/estadisticas", "No se pudieron cargar las estadísticas")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let api = ObservatorioApi::new("http://localhost:8000/");
        assert_eq!(api.url("/cuerpos-agua"), "http://localhost:8000/cuerpos-agua");
        assert_eq!(api.url("cuerpos-agua"), "http://localhost:8000/cuerpos-agua");
    }

    #[test]
    fn error_detail_plain_string() {
        let body = r#"{"detail": "Credenciales inválidas"}"#;
        assert_eq!(error_detail(body, "x"), "Credenciales inválidas");
    }

    #[test]
    fn error_detail_validation_list_joins_msgs() {
        let body = r#"{"detail": [
            {"loc": ["body", "latitud"], "msg": "field required"},
            {"loc": ["body", "ph"], "msg": "value is not a valid float"}
        ]}"#;
        assert_eq!(
            error_detail(body, "x"),
            "field required | value is not a valid float"
        );
    }

    #[test]
    fn error_detail_object_with_msg() {
        let body = r#"{"detail": {"msg": "conflicto"}}"#;
        assert_eq!(error_detail(body, "x"), "conflicto");
    }

    #[test]
    fn error_detail_falls_back() {
        assert_eq!(error_detail("", "genérico"), "genérico");
        assert_eq!(error_detail("<html>502</html>", "genérico"), "genérico");
        assert_eq!(error_detail(r#"{"detail": null}"#, "genérico"), "genérico");
        assert_eq!(error_detail(r#"{"detail": []}"#, "genérico"), "genérico");
    }

    #[test]
    fn body_encoding_failure_is_parse_not_network() {
        let serde_err = serde_json::from_str::<i64>("no-es-json").unwrap_err();
        let err = encode_error(serde_err);
        assert!(matches!(err, ApiError::Parse(_)));
        assert!(!matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn unauthorized_is_detected_by_status_code() {
        let err = ApiError::Status {
            code: 401,
            detail: "No se pudo validar el token".into(),
        };
        assert!(err.is_unauthorized());
        let err = ApiError::Status {
            code: 409,
            detail: "El favorito ya existe".into(),
        };
        assert!(!err.is_unauthorized());
        assert!(!ApiError::Network("timeout".into()).is_unauthorized());
    }
}
