//! Demo data for an empty database, enabled with `TASKBOARD_SEED=1`.

use board_protocol::{NewBoard, NewTask, ReorderEntry, TaskPriority, TaskStatus};
use db::{
    DBService, DbErr, TransactionTrait,
    models::{board, task},
};
use uuid::Uuid;

use TaskPriority::{High, Low, Medium};
use TaskStatus::{Done, InProgress, Todo};

struct SeedBoard {
    name: &'static str,
    description: &'static str,
    color: &'static str,
    tasks: &'static [(&'static str, &'static str, TaskStatus, TaskPriority)],
}

const SEED_BOARDS: &[SeedBoard] = &[
    SeedBoard {
        name: "Project Alpha",
        description: "Main development project for Q1 2026",
        color: "#58A6FF",
        tasks: &[
            ("Set up CI/CD pipeline", "Configure GitHub Actions for automated testing and deployment", Done, High),
            ("Design database schema", "Create ERD and define all tables for the application", Done, High),
            ("Build authentication module", "Implement JWT-based auth with refresh tokens", InProgress, High),
            ("Create API documentation", "Document all REST endpoints using OpenAPI spec", InProgress, Medium),
            ("Write unit tests", "Achieve 80% code coverage for core modules", Todo, Medium),
            ("Performance optimization", "Profile and optimize slow database queries", Todo, Low),
            ("Set up error monitoring", "Integrate Sentry for production error tracking", Todo, High),
            ("Implement rate limiting", "Add rate limiting middleware to all API endpoints", Todo, Medium),
            ("Build user dashboard", "Create dashboard page with analytics and recent activity", InProgress, High),
            ("Configure staging environment", "Set up staging server mirroring production", Done, Medium),
        ],
    },
    SeedBoard {
        name: "Mobile App v2",
        description: "React Native mobile app redesign and feature update",
        color: "#3FB950",
        tasks: &[
            ("Migrate to React Navigation 7", "Update navigation library and fix breaking changes", Done, High),
            ("Redesign onboarding flow", "New 3-step onboarding with animations", InProgress, High),
            ("Implement push notifications", "Set up Firebase Cloud Messaging for iOS and Android", InProgress, High),
            ("Add biometric login", "Support Face ID and fingerprint authentication", Todo, Medium),
            ("Offline mode support", "Cache data locally and sync when connection is restored", Todo, High),
            ("Dark mode toggle", "Allow users to switch between light and dark themes", Done, Low),
            ("Fix crash on image upload", "App crashes when uploading images larger than 10MB", InProgress, High),
            ("Integrate in-app purchases", "Set up StoreKit for iOS and Google Play Billing", Todo, Medium),
            ("Accessibility audit", "Ensure app meets WCAG 2.1 AA standards", Todo, Medium),
            ("App Store screenshots", "Create new promotional screenshots for both stores", Todo, Low),
        ],
    },
];

/// Inserts the demo boards when no board exists yet. Returns how many were created.
pub async fn seed_if_empty(db: &DBService) -> Result<usize, DbErr> {
    if board::count(&db.pool).await? > 0 {
        tracing::info!("Database already has boards, skipping seed");
        return Ok(0);
    }

    let tx = db.pool.begin().await?;
    for seed in SEED_BOARDS {
        let created = board::create(
            &tx,
            &NewBoard {
                name: seed.name.to_string(),
                description: Some(seed.description.to_string()),
                color: Some(seed.color.to_string()),
            },
            Uuid::new_v4(),
        )
        .await?;

        let mut next_order = [0i32; 3];
        let mut entries = Vec::with_capacity(seed.tasks.len());
        for &(title, description, status, priority) in seed.tasks {
            let new_task = NewTask {
                board_id: created.id,
                title: title.to_string(),
                description: Some(description.to_string()),
                status,
                priority,
                due_date: None,
            };
            let task = task::create(&tx, &new_task, Uuid::new_v4())
                .await
                .map_err(into_db_err)?;
            let slot = &mut next_order[status.index()];
            entries.push(ReorderEntry {
                id: task.id,
                status,
                order: *slot,
            });
            *slot += 1;
        }
        task::reorder(&tx, &entries).await.map_err(into_db_err)?;

        tracing::info!("Seeded board: {} ({})", created.name, created.id);
    }
    tx.commit().await?;

    Ok(SEED_BOARDS.len())
}

fn into_db_err(err: task::TaskError) -> DbErr {
    match err {
        task::TaskError::Database(err) => err,
        other => DbErr::Custom(other.to_string()),
    }
}
