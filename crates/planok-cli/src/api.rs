//! PlanOk API Client

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// API Client for PlanOk
#[derive(Clone)]
pub struct PlanOkClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

/// The server rejected the access token (expired or revoked)
#[derive(Debug)]
pub struct Unauthorized;

impl fmt::Display for Unauthorized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Session expired or invalid. Run 'planok login' again.")
    }
}

impl std::error::Error for Unauthorized {}

// ============================================
// API Response Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Deserialize)]
pub struct AccessTokenResponse {
    pub access: String,
}

#[derive(Debug, Deserialize)]
pub struct WhoAmI {
    pub email: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub nombre: String,
    pub ubicacion: String,
    pub estado: String,
    pub codigo: String,
    pub fecha_inicio: String,
    pub fecha_finalizacion: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: ProjectResponse,
    #[serde(default)]
    pub descripcion: String,
    pub unidades: Vec<UnitResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectStatistics {
    pub total_proyectos: usize,
    pub proyectos_por_estado: BTreeMap<String, usize>,
    pub proyectos_activos: usize,
}

#[derive(Debug, Deserialize)]
pub struct UnitResponse {
    pub id: Uuid,
    pub proyecto: Uuid,
    pub numero_unidad: String,
    pub tipo_unidad: String,
    pub metraje_cuadrado: f64,
    pub precio_venta: f64,
    pub estado: String,
    pub cliente: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UnitStatistics {
    pub total_unidades: usize,
    pub precio_promedio: Option<f64>,
    pub precio_minimo: Option<f64>,
    pub precio_maximo: Option<f64>,
    pub unidades_por_estado: BTreeMap<String, usize>,
    pub unidades_por_tipo: BTreeMap<String, usize>,
}

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub rut: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Debug, Serialize)]
struct AssignClientRequest {
    cliente_id: Uuid,
}

/// Unit listing filters
#[derive(Debug, Default, Serialize)]
pub struct UnitQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proyecto: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_unidad: Option<String>,
}

impl PlanOkClient {
    /// Create a new API client
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let resp = self
            .authorized(request)
            .send()
            .await
            .context("Failed to connect to PlanOk API")?;

        let resp = check(resp).await?;
        resp.json().await.context("Failed to parse response")
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.client.get(self.url(path))).await
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let resp = self.client.get(self.url("/health")).send().await?;
        Ok(resp.status().is_success())
    }

    /// Exchange credentials for a token pair
    pub async fn obtain_token(&self, email: &str, password: &str) -> Result<TokenResponse> {
        let request = self
            .client
            .post(self.url("/api/v1/token"))
            .json(&TokenRequest { email, password });
        self.send(request)
            .await
            .map_err(|e| {
                if e.is::<Unauthorized>() {
                    anyhow::anyhow!("Invalid email or password")
                } else {
                    e
                }
            })
    }

    /// New access token from a refresh token
    pub async fn refresh(&self, refresh: &str) -> Result<String> {
        let request = self
            .client
            .post(self.url("/api/v1/token/refresh"))
            .json(&RefreshRequest { refresh });
        let resp: AccessTokenResponse = self.send(request).await?;
        Ok(resp.access)
    }

    pub async fn whoami(&self) -> Result<WhoAmI> {
        self.get("/api/v1/test-token").await
    }

    pub async fn list_projects(&self, estado: Option<&str>) -> Result<Vec<ProjectResponse>> {
        let mut request = self.client.get(self.url("/api/v1/proyectos"));
        if let Some(estado) = estado {
            request = request.query(&[("estado", estado)]);
        }
        self.send(request).await
    }

    pub async fn get_project(&self, id: Uuid) -> Result<ProjectDetail> {
        self.get(&format!("/api/v1/proyectos/{}", id)).await
    }

    pub async fn project_statistics(&self) -> Result<ProjectStatistics> {
        self.get("/api/v1/proyectos/estadisticas").await
    }

    pub async fn list_units(&self, query: &UnitQuery) -> Result<Vec<UnitResponse>> {
        let request = self.client.get(self.url("/api/v1/unidades")).query(query);
        self.send(request).await
    }

    pub async fn available_units(&self) -> Result<Vec<UnitResponse>> {
        self.get("/api/v1/unidades/disponibles").await
    }

    /// Reserve a unit for a client
    pub async fn reserve_unit(&self, unit_id: Uuid, client_id: Uuid) -> Result<UnitResponse> {
        let request = self
            .client
            .post(self.url(&format!("/api/v1/unidades/{}/asignar_cliente", unit_id)))
            .json(&AssignClientRequest {
                cliente_id: client_id,
            });
        self.send(request).await
    }

    /// Close the sale of a reserved unit
    pub async fn sell_unit(&self, unit_id: Uuid) -> Result<UnitResponse> {
        let request = self.client.post(self.url(&format!(
            "/api/v1/unidades/{}/marcar_como_vendida",
            unit_id
        )));
        self.send(request).await
    }

    pub async fn unit_statistics(&self, project_id: Uuid) -> Result<UnitStatistics> {
        let request = self
            .client
            .get(self.url("/api/v1/unidades/estadisticas_por_proyecto"))
            .query(&[("proyecto_id", project_id)]);
        self.send(request).await
    }

    pub async fn list_clients(&self) -> Result<Vec<UserResponse>> {
        self.get("/api/v1/usuarios/clientes").await
    }
}

/// Turn error statuses into errors, keeping the server's message
async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Unauthorized.into());
    }

    let body = resp.text().await.unwrap_or_default();
    bail!("API error ({}): {}", status, error_message(&body));
}

/// `{"error": "..."}`, `{"error": {"code", "message"}}` or a field map
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };

    match value.get("error") {
        Some(serde_json::Value::String(message)) => message.clone(),
        Some(rule) => match (rule.get("code"), rule.get("message")) {
            (Some(code), Some(serde_json::Value::String(message))) => {
                format!("{} ({})", message, code.as_str().unwrap_or_default())
            }
            _ => rule.to_string(),
        },
        None => value
            .as_object()
            .map(|fields| {
                fields
                    .iter()
                    .map(|(field, messages)| format!("{}: {}", field, join_messages(messages)))
                    .collect::<Vec<_>>()
                    .join("; ")
            })
            .unwrap_or_else(|| body.to_string()),
    }
}

fn join_messages(messages: &serde_json::Value) -> String {
    match messages.as_array() {
        Some(items) => items
            .iter()
            .filter_map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        None => messages.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(error_message(r#"{"error": "Unit not found"}"#), "Unit not found");
        assert_eq!(
            error_message(
                r#"{"error": {"code": "unidad_no_disponible", "message": "Unit is not available"}}"#
            ),
            "Unit is not available (unidad_no_disponible)"
        );
        assert_eq!(
            error_message(r#"{"email": ["Invalid email format"], "rut": ["RUT is required"]}"#),
            "email: Invalid email format; rut: RUT is required"
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let client = PlanOkClient::new("http://localhost:8000/", None);
        assert_eq!(client.url("/health"), "http://localhost:8000/health");
    }

    #[test]
    fn test_unit_query_skips_empty_filters() {
        let query = UnitQuery {
            estado: Some("Disponible".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json, serde_json::json!({"estado": "Disponible"}));
    }
}
