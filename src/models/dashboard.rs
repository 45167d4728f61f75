// src/models/dashboard.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::complaint::{Category, Complaint, ComplaintStatus};

// Qual painel cada papel enxerga
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum DashboardVariant {
    Admin,
    DepartmentAdmin,
    FieldAgent,
    ServiceProvider,
    User,
}

// 1. Os cards do topo
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
}

impl DashboardStats {
    pub fn from_complaints<'a>(complaints: impl IntoIterator<Item = &'a Complaint>) -> Self {
        complaints.into_iter().fold(Self::default(), |mut stats, c| {
            stats.total += 1;
            match c.status {
                ComplaintStatus::Pending => stats.pending += 1,
                ComplaintStatus::InProgress => stats.in_progress += 1,
                ComplaintStatus::Resolved => stats.resolved += 1,
            }
            stats
        })
    }
}

// 2. Filtros da lista (?status=Pending&category=water)
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardFilter {
    pub status: Option<ComplaintStatus>,
    pub category: Option<Category>,
}

impl DashboardFilter {
    pub fn matches(&self, complaint: &Complaint) -> bool {
        self.status.is_none_or(|s| complaint.status == s)
            && self.category.is_none_or(|c| complaint.category == c)
    }
}

// O que o usuário pode fazer com uma reclamação
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintPermissions {
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_change_status: bool,
    pub can_assign: bool,
    pub allowed_statuses: Vec<ComplaintStatus>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintView {
    #[serde(flatten)]
    pub complaint: Complaint,
    pub permissions: ComplaintPermissions,
}

// 3. O painel completo
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub variant: DashboardVariant,
    #[schema(example = "Water Department Dashboard")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<bool>,
    pub stats: DashboardStats,
    pub complaints: Vec<ComplaintView>,
}
