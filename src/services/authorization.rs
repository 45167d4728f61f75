// src/services/authorization.rs
//
// Regras de acesso por papel. Todo painel e todo handler passa por aqui.

use crate::models::{
    auth::{Department, Role, User},
    complaint::{Complaint, ComplaintStatus},
    dashboard::ComplaintPermissions,
};

// A reclamação foi atribuída a este usuário (como equipe ou prestador)?
pub fn is_assigned_to(actor: &User, complaint: &Complaint) -> bool {
    [&complaint.assigned_to, &complaint.assigned_provider]
        .into_iter()
        .flatten()
        .any(|assignee| actor.matches_assignee(assignee))
}

// Departamento do usuário que não atende nenhuma categoria (Parks)
pub fn unmapped_department(actor: &User) -> Option<Department> {
    actor.department.filter(|department| department.category().is_none())
}

fn in_department(actor: &User, complaint: &Complaint) -> bool {
    actor
        .department
        .and_then(|department| department.category())
        .is_some_and(|category| complaint.category == category)
}

pub fn can_view(actor: &User, complaint: &Complaint) -> bool {
    if complaint.user_id == actor.id {
        return true;
    }

    match actor.role {
        Role::SuperAdmin => true,
        Role::DepartmentAdmin | Role::ServiceProvider => {
            in_department(actor, complaint) || is_assigned_to(actor, complaint)
        }
        Role::FieldAgent => complaint.is_unassigned() || is_assigned_to(actor, complaint),
        Role::User => false,
    }
}

pub fn can_edit(actor: &User, complaint: &Complaint) -> bool {
    complaint.user_id == actor.id || matches!(actor.role, Role::SuperAdmin | Role::DepartmentAdmin)
}

pub fn can_delete(actor: &User, complaint: &Complaint) -> bool {
    can_edit(actor, complaint)
}

pub fn can_change_status(actor: &User, complaint: &Complaint) -> bool {
    match actor.role {
        Role::SuperAdmin | Role::DepartmentAdmin | Role::FieldAgent => true,
        Role::ServiceProvider => is_assigned_to(actor, complaint),
        Role::User => false,
    }
}

pub fn can_assign(actor: &User) -> bool {
    matches!(actor.role, Role::SuperAdmin | Role::DepartmentAdmin)
}

pub fn can_submit(actor: &User) -> bool {
    actor.role == Role::User
}

/// Resumo do que `actor` pode fazer com `complaint`.
/// `allowed_statuses` já inclui só os próximos passos da tabela de transições.
pub fn permissions_for(actor: &User, complaint: &Complaint) -> ComplaintPermissions {
    let can_change_status = can_change_status(actor, complaint);

    ComplaintPermissions {
        can_edit: can_edit(actor, complaint),
        can_delete: can_delete(actor, complaint),
        can_change_status,
        can_assign: can_assign(actor),
        allowed_statuses: if can_change_status {
            complaint.status.next_statuses().to_vec()
        } else {
            Vec::<ComplaintStatus>::new()
        },
    }
}

pub fn visible_complaints(actor: &User, complaints: Vec<Complaint>) -> Vec<Complaint> {
    // Um aviso por consulta, não um por reclamação
    if let Some(department) = unmapped_department(actor) {
        tracing::warn!(
            user_id = %actor.id,
            department = department.as_str(),
            "Departamento sem categoria mapeada; só as reclamações atribuídas ficam visíveis"
        );
    }
    complaints.into_iter().filter(|c| can_view(actor, c)).collect()
}
