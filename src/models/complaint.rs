// src/models/complaint.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::error::AppError;

// Limite do upload de foto (data URI)
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

// Corpo máximo aceito: foto em base64 (4/3) mais o restante do JSON
pub const MAX_REQUEST_BYTES: usize = MAX_IMAGE_BYTES / 3 * 4 + 1024 * 1024;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Pothole,
    Garbage,
    Streetlight,
    Water,
    Noise,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Pothole,
        Category::Garbage,
        Category::Streetlight,
        Category::Water,
        Category::Noise,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pothole => "pothole",
            Category::Garbage => "garbage",
            Category::Streetlight => "streetlight",
            Category::Water => "water",
            Category::Noise => "noise",
            Category::Other => "other",
        }
    }

    // Rótulo exibido no formulário de envio
    pub fn label(&self) -> &'static str {
        match self {
            Category::Pothole => "Pothole",
            Category::Garbage => "Garbage Collection",
            Category::Streetlight => "Street Light",
            Category::Water => "Water/Drainage",
            Category::Noise => "Noise Complaint",
            Category::Other => "Other",
        }
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AppError::InternalServerError(anyhow::anyhow!("Categoria desconhecida: {}", s)))
    }
}

/// Estágio do ciclo de vida de uma reclamação.
///
/// As transições permitidas são `Pending -> In Progress -> Resolved`;
/// `Resolved` é terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ComplaintStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 3] = [
        ComplaintStatus::Pending,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "Pending",
            ComplaintStatus::InProgress => "In Progress",
            ComplaintStatus::Resolved => "Resolved",
        }
    }

    // A tabela de transições
    pub fn next_statuses(&self) -> &'static [ComplaintStatus] {
        match self {
            ComplaintStatus::Pending => &[ComplaintStatus::InProgress],
            ComplaintStatus::InProgress => &[ComplaintStatus::Resolved],
            ComplaintStatus::Resolved => &[],
        }
    }

    pub fn can_transition_to(&self, target: ComplaintStatus) -> bool {
        self.next_statuses().contains(&target)
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComplaintStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| AppError::InternalServerError(anyhow::anyhow!("Status desconhecido: {}", s)))
    }
}

// Equipes disponíveis no modal de atribuição
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Team {
    #[serde(rename = "Road Maintenance Team")]
    RoadMaintenance,
    #[serde(rename = "Waste Management Team")]
    WasteManagement,
    #[serde(rename = "Electrical Services Team")]
    ElectricalServices,
    #[serde(rename = "Water Department")]
    WaterDepartment,
    #[serde(rename = "Environmental Services")]
    EnvironmentalServices,
    #[serde(rename = "Public Safety Department")]
    PublicSafety,
}

impl Team {
    pub const ALL: [Team; 6] = [
        Team::RoadMaintenance,
        Team::WasteManagement,
        Team::ElectricalServices,
        Team::WaterDepartment,
        Team::EnvironmentalServices,
        Team::PublicSafety,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Team::RoadMaintenance => "Road Maintenance Team",
            Team::WasteManagement => "Waste Management Team",
            Team::ElectricalServices => "Electrical Services Team",
            Team::WaterDepartment => "Water Department",
            Team::EnvironmentalServices => "Environmental Services",
            Team::PublicSafety => "Public Safety Department",
        }
    }
}

// --- ENTIDADE ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[validate(range(min = -90.0, max = 90.0, message = "A latitude deve estar entre -90 e 90."))]
    #[schema(example = 40.7128)]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "A longitude deve estar entre -180 e 180."))]
    #[schema(example = -74.006)]
    pub lng: f64,

    #[serde(default)]
    #[schema(example = "123 Main Street, New York, NY")]
    pub address: String,
}

impl Location {
    // Sem endereço digitado, usamos as coordenadas (como o seletor de localização faz)
    fn normalized(mut self) -> Self {
        self.address = self.address.trim().to_string();
        if self.address.is_empty() {
            self.address = format!("{:.6}, {:.6}", self.lat, self.lng);
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: Uuid,
    #[schema(example = "Broken light")]
    pub title: String,
    pub description: String,
    pub category: Category,
    pub status: ComplaintStatus,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Road Maintenance Team")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Carimbo para uma mutação: nunca anterior nem igual ao `updated_at` atual.
///
/// O relógio é truncado em microssegundos para bater com a precisão do
/// `TIMESTAMPTZ` do Postgres.
pub fn next_timestamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let now = now.trunc_subsecs(6);
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

impl Complaint {
    pub fn new(payload: NewComplaint, user_id: Uuid, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(6);
        Self {
            id: Uuid::new_v4(),
            title: payload.title.trim().to_string(),
            description: payload.description.trim().to_string(),
            category: payload.category,
            status: ComplaintStatus::Pending,
            location: payload.location.normalized(),
            image_url: payload.image_url.filter(|url| !url.trim().is_empty()),
            user_id,
            assigned_to: None,
            assigned_provider: None,
            resolution_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn touch(&mut self) {
        self.updated_at = next_timestamp(self.updated_at, Utc::now());
    }

    /// Aplica uma mudança de status consultando a tabela de transições.
    ///
    /// Reaplicar o status atual é aceito (idempotente) e apenas renova o
    /// `updated_at`.
    pub fn transition_to(&mut self, target: ComplaintStatus, notes: Option<String>) -> Result<(), AppError> {
        if self.status != target && !self.status.can_transition_to(target) {
            return Err(AppError::InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }

        self.status = target;
        if let Some(notes) = notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
            self.resolution_notes = Some(notes);
        }
        self.touch();
        Ok(())
    }

    // Atribuição não mexe no status
    pub fn assign(&mut self, assignment: &Assignment) {
        if let Some(team) = assignment.assigned_to {
            self.assigned_to = Some(team.as_str().to_string());
        }
        // Prestador em branco não sobrescreve o atual
        if let Some(provider) = assignment
            .assigned_provider
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            self.assigned_provider = Some(provider.to_string());
        }
        self.touch();
    }

    pub fn apply_changes(&mut self, changes: ComplaintChanges) {
        if let Some(title) = changes.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = changes.description {
            self.description = description.trim().to_string();
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(location) = changes.location {
            self.location = location.normalized();
        }
        if let Some(image_url) = changes.image_url {
            // String vazia remove a foto
            self.image_url = Some(image_url).filter(|url| !url.trim().is_empty());
        }
        self.touch();
    }

    pub fn is_unassigned(&self) -> bool {
        self.assigned_to.is_none() && self.assigned_provider.is_none()
    }
}

// --- PAYLOADS ---

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("O campo é obrigatório.".into());
        return Err(err);
    }
    Ok(())
}

// Aceita URL http(s) ou data URI de imagem com até 5MB
fn validate_image_url(url: &str) -> Result<(), ValidationError> {
    let url = url.trim();
    if url.is_empty() || url.starts_with("http://") || url.starts_with("https://") {
        return Ok(());
    }

    if let Some(rest) = url.strip_prefix("data:") {
        if !rest.starts_with("image/") {
            let mut err = ValidationError::new("image_type");
            err.message = Some("Selecione um arquivo de imagem.".into());
            return Err(err);
        }
        let payload = rest.split_once(',').map(|(_, data)| data).unwrap_or("");
        // base64: 4 caracteres para cada 3 bytes
        if payload.len() / 4 * 3 > MAX_IMAGE_BYTES {
            let mut err = ValidationError::new("image_size");
            err.message = Some("A imagem deve ter menos de 5MB.".into());
            return Err(err);
        }
        return Ok(());
    }

    let mut err = ValidationError::new("url");
    err.message = Some("URL de imagem inválida.".into());
    Err(err)
}

// Complaint sem id, status e carimbos: o que o formulário de envio manda
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewComplaint {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Broken light")]
    pub title: String,

    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "The streetlight on the corner has been out for a week.")]
    pub description: String,

    #[schema(example = "streetlight")]
    pub category: Category,

    #[validate(nested)]
    pub location: Location,

    #[validate(custom(function = "validate_image_url"))]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintChanges {
    #[validate(custom(function = "validate_not_blank"))]
    pub title: Option<String>,

    #[validate(custom(function = "validate_not_blank"))]
    pub description: Option<String>,

    pub category: Option<Category>,

    #[validate(nested)]
    pub location: Option<Location>,

    #[validate(custom(function = "validate_image_url"))]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdatePayload {
    #[schema(example = "In Progress")]
    pub status: ComplaintStatus,

    // Notas de conclusão (obrigatórias para prestadores ao resolver)
    #[validate(length(max = 2000, message = "As notas devem ter no máximo 2000 caracteres."))]
    pub notes: Option<String>,
}

fn validate_assignment(payload: &Assignment) -> Result<(), ValidationError> {
    let has_provider = payload
        .assigned_provider
        .as_deref()
        .is_some_and(|p| !p.trim().is_empty());

    if payload.assigned_to.is_none() && !has_provider {
        let mut err = ValidationError::new("assignee_required");
        err.message = Some("Informe uma equipe ou um prestador.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_assignment"))]
pub struct Assignment {
    #[schema(example = "Road Maintenance Team")]
    pub assigned_to: Option<Team>,
    pub assigned_provider: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInfo {
    pub value: Category,
    pub label: String,
}
