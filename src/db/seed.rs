// src/db/seed.rs

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::models::complaint::{Category, Complaint, ComplaintStatus, Location};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Reclamações de demonstração, mais recente primeiro.
/// Pertencem ao usuário de demonstração `user@example.com`.
pub fn demo_complaints(owner: Uuid) -> Vec<Complaint> {
    vec![
        Complaint {
            id: Uuid::from_u128(2),
            title: "Overflowing garbage bin".into(),
            description: "The garbage bin at Central Park entrance has been overflowing for days.".into(),
            category: Category::Garbage,
            status: ComplaintStatus::Pending,
            location: Location {
                lat: 40.7829,
                lng: -73.9654,
                address: "Central Park Entrance, New York, NY".into(),
            },
            image_url: None,
            user_id: owner,
            assigned_to: None,
            assigned_provider: None,
            resolution_notes: None,
            created_at: at(2024, 1, 16, 9, 15),
            updated_at: at(2024, 1, 16, 9, 15),
        },
        Complaint {
            id: Uuid::from_u128(1),
            title: "Large pothole on Main Street".into(),
            description: "There is a dangerous pothole near the intersection that needs immediate attention.".into(),
            category: Category::Pothole,
            status: ComplaintStatus::InProgress,
            location: Location {
                lat: 40.7128,
                lng: -74.0060,
                address: "123 Main Street, New York, NY".into(),
            },
            image_url: Some("https://images.unsplash.com/photo-1578662996442-48f60103fc96?w=400".into()),
            user_id: owner,
            assigned_to: Some("Road Maintenance Team".into()),
            assigned_provider: None,
            resolution_notes: None,
            created_at: at(2024, 1, 15, 10, 30),
            updated_at: at(2024, 1, 16, 14, 20),
        },
    ]
}
