// src/services/dashboard_service.rs

use crate::{
    common::error::AppError,
    models::{
        auth::{Role, User},
        complaint::Complaint,
        dashboard::{ComplaintView, Dashboard, DashboardFilter, DashboardStats, DashboardVariant},
    },
    services::{authorization, complaint_service::ComplaintService},
};

// Papel -> painel
pub fn select(user: &User) -> DashboardVariant {
    match user.role {
        Role::SuperAdmin => DashboardVariant::Admin,
        Role::DepartmentAdmin => DashboardVariant::DepartmentAdmin,
        Role::FieldAgent => DashboardVariant::FieldAgent,
        Role::ServiceProvider => DashboardVariant::ServiceProvider,
        Role::User => DashboardVariant::User,
    }
}

pub fn title_for(user: &User) -> String {
    match select(user) {
        DashboardVariant::Admin => "Admin Dashboard".to_string(),
        DashboardVariant::DepartmentAdmin => match user.department {
            Some(department) => format!("{} Department Dashboard", department.display_name()),
            None => "Department Dashboard".to_string(),
        },
        DashboardVariant::FieldAgent => "Field Agent Dashboard".to_string(),
        DashboardVariant::ServiceProvider => "Service Provider Dashboard".to_string(),
        DashboardVariant::User => "My Complaints".to_string(),
    }
}

/// Monta o painel a partir de uma lista já restrita ao que `actor` enxerga.
/// As estatísticas ignoram o filtro; a lista respeita.
pub fn compose(actor: &User, visible: Vec<Complaint>, filter: &DashboardFilter) -> Dashboard {
    let stats = DashboardStats::from_complaints(&visible);

    let complaints = visible
        .into_iter()
        .filter(|c| filter.matches(c))
        .map(|complaint| ComplaintView {
            permissions: authorization::permissions_for(actor, &complaint),
            complaint,
        })
        .collect();

    Dashboard {
        variant: select(actor),
        title: title_for(actor),
        availability: actor.availability,
        stats,
        complaints,
    }
}

#[derive(Clone)]
pub struct DashboardService {
    complaint_service: ComplaintService,
}

impl DashboardService {
    pub fn new(complaint_service: ComplaintService) -> Self {
        Self { complaint_service }
    }

    pub async fn build(&self, actor: &User, filter: &DashboardFilter) -> Result<Dashboard, AppError> {
        // O painel do cidadão usa a visão por dono; os demais passam pelas regras de acesso
        let visible = match actor.role {
            Role::User => self.complaint_service.list_for_user(actor.id).await?,
            _ => self.complaint_service.list_visible(actor).await?,
        };

        Ok(compose(actor, visible, filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        auth::Department,
        complaint::{Category, ComplaintStatus, Location},
    };
    use chrono::Utc;
    use uuid::Uuid;

    fn complaint(category: Category, status: ComplaintStatus) -> Complaint {
        let now = Utc::now();
        Complaint {
            id: Uuid::new_v4(),
            title: "t".into(),
            description: "d".into(),
            category,
            status,
            location: Location { lat: 0.0, lng: 0.0, address: "a".into() },
            image_url: None,
            user_id: Uuid::new_v4(),
            assigned_to: None,
            assigned_provider: None,
            resolution_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn every_role_has_a_variant() {
        let id = Uuid::new_v4();
        let cases = [
            (Role::SuperAdmin, DashboardVariant::Admin),
            (Role::DepartmentAdmin, DashboardVariant::DepartmentAdmin),
            (Role::FieldAgent, DashboardVariant::FieldAgent),
            (Role::ServiceProvider, DashboardVariant::ServiceProvider),
            (Role::User, DashboardVariant::User),
        ];
        for (role, variant) in cases {
            let user = User::new(id, "x@example.com", "X", role, Some(Department::Roads));
            assert_eq!(select(&user), variant);
        }
    }

    #[test]
    fn department_title_uses_the_department_name() {
        let user = User::new(Uuid::new_v4(), "w@example.com", "W", Role::DepartmentAdmin, Some(Department::Water));
        assert_eq!(title_for(&user), "Water Department Dashboard");
    }

    #[test]
    fn stats_count_everything_but_list_is_filtered() {
        let admin = User::new(Uuid::new_v4(), "a@example.com", "A", Role::SuperAdmin, None);
        let visible = vec![
            complaint(Category::Water, ComplaintStatus::Pending),
            complaint(Category::Water, ComplaintStatus::Resolved),
            complaint(Category::Noise, ComplaintStatus::InProgress),
        ];
        let filter = DashboardFilter { status: None, category: Some(Category::Water) };

        let dashboard = compose(&admin, visible, &filter);
        assert_eq!(
            dashboard.stats,
            DashboardStats { total: 3, pending: 1, in_progress: 1, resolved: 1 }
        );
        assert_eq!(dashboard.complaints.len(), 2);
        assert!(dashboard.complaints.iter().all(|v| v.permissions.can_assign));
    }
}
