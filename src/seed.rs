use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::db::DbPool;
use crate::error::Result;
use crate::models::{
    ClassRequest, CreateAvailability, CreateGoal, CreateHealthMetric, CreateInvoice,
    CreateMember, CreatePtSession, CreateRoom, CreateTrainer, InvoiceStatus, SessionStatus,
};
use crate::repositories::{
    ClassRepository, InvoiceRepository, MemberRepository, ProgressRepository, RoomRepository,
    SessionRepository, TrainerRepository,
};

const ROOMS: usize = 25;
const TRAINERS: usize = 25;
const MEMBERS: usize = 40;
const CLASSES: usize = 30;
const GOALS: usize = 12;
const METRICS: usize = 15;
const PT_SESSIONS: usize = 24;
const INVOICES: usize = 30;
const REGISTERED_CLASSES: usize = 5;
const MEMBERS_PER_CLASS: usize = 3;

const FIRST_NAMES: &[&str] = &[
    "Alex", "Blair", "Casey", "Devon", "Emery", "Finley", "Harper", "Jordan",
];
const LAST_NAMES: &[&str] = &["Ng", "Okafor", "Silva", "Larsen", "Kim"];
const SPECIALTIES: &[&str] = &["Strength", "Yoga", "Cycling", "Boxing", "Pilates"];
const CLASS_TITLES: &[&str] = &["HIIT", "Vinyasa Flow", "Spin", "Kickboxing", "Core"];
const GOAL_TYPES: &[&str] = &["Weight loss", "Muscle gain", "Endurance"];

/// Load a deterministic demo dataset relative to `now`, going through the
/// repositories so every rule applies to seeded rows too.
///
/// Returns `false` without writing anything when a member already exists.
pub async fn seed_data(pool: &DbPool, now: NaiveDateTime) -> Result<bool> {
    let members = MemberRepository::new(pool.clone());
    if members.count().await? > 0 {
        tracing::info!("Database already has members, skipping seed");
        return Ok(false);
    }

    let rooms = RoomRepository::new(pool.clone());
    let trainers = TrainerRepository::new(pool.clone());
    let classes = ClassRepository::new(pool.clone());
    let sessions = SessionRepository::new(pool.clone());
    let progress = ProgressRepository::new(pool.clone());
    let invoices = InvoiceRepository::new(pool.clone());

    let midnight = now.date().and_time(NaiveTime::MIN);
    let slot = |day: i64, hour: i64| midnight + Duration::days(day) + Duration::hours(hour);

    let mut room_ids = Vec::with_capacity(ROOMS);
    for i in 1..=ROOMS {
        let room = rooms
            .create(CreateRoom {
                name: format!("Studio {}", i),
                capacity: 20 + (i % 10) as i64,
            })
            .await?;
        room_ids.push(room.id);
    }

    let mut trainer_ids = Vec::with_capacity(TRAINERS);
    for i in 0..TRAINERS {
        let trainer = trainers
            .create(CreateTrainer {
                full_name: format!("Coach {}", person_name(i + 3)),
                email: format!("coach{}@fitclub.test", i + 1),
                specialty: Some(SPECIALTIES[i % SPECIALTIES.len()].to_string()),
            })
            .await?;
        for (start, end) in [(slot(1, 8), slot(1, 12)), (slot(2, 13), slot(2, 17))] {
            trainers
                .add_availability(
                    trainer.id,
                    CreateAvailability {
                        start_time: start,
                        end_time: end,
                    },
                )
                .await?;
        }
        trainer_ids.push(trainer.id);
    }

    let mut member_ids = Vec::with_capacity(MEMBERS);
    for i in 0..MEMBERS {
        let member = members
            .create(CreateMember {
                full_name: person_name(i),
                email: format!("member{}@fitclub.test", i + 1),
                phone: Some(format!("555-01{:02}", i)),
                date_of_birth: None,
                gender: None,
            })
            .await?;
        member_ids.push(member.id);
    }

    // Each trainer teaches at most once per day, so seeded classes never clash.
    let mut class_ids = Vec::with_capacity(CLASSES);
    for i in 0..CLASSES {
        let day = 1 + (i / TRAINERS) as i64;
        let class = classes
            .create(ClassRequest {
                title: CLASS_TITLES[i % CLASS_TITLES.len()].to_string(),
                description: None,
                start_time: slot(day, 9),
                end_time: slot(day, 10),
                max_capacity: 10 + (i % 10) as i64,
                trainer_id: trainer_ids[i % TRAINERS],
                room_id: room_ids[i % ROOMS],
            })
            .await?;
        class_ids.push(class.id);
    }

    for (c, class_id) in class_ids.iter().take(REGISTERED_CLASSES).enumerate() {
        for m in 0..MEMBERS_PER_CLASS {
            let member_id = member_ids[(c * MEMBERS_PER_CLASS + m) % MEMBERS];
            classes.register(member_id, *class_id, now).await?;
        }
    }

    for (i, member_id) in member_ids.iter().take(GOALS).enumerate() {
        let start = now.date();
        progress
            .set_active_goal(
                *member_id,
                CreateGoal {
                    goal_type: GOAL_TYPES[i % GOAL_TYPES.len()].to_string(),
                    target_value: 60.0 + i as f64,
                    start_date: start,
                    target_date: start + Duration::days(90),
                },
            )
            .await?;
    }

    for (i, member_id) in member_ids.iter().take(METRICS).enumerate() {
        progress
            .record_metric(
                *member_id,
                CreateHealthMetric {
                    recorded_at: Some(slot(-1, 7)),
                    weight_kg: Some(65.0 + i as f64),
                    heart_rate_bpm: Some(60 + (i % 20) as i64),
                    body_fat_percent: Some(18.0 + (i % 8) as f64),
                },
                now,
            )
            .await?;
    }

    for i in 0..PT_SESSIONS {
        let session = sessions
            .schedule(CreatePtSession {
                member_id: member_ids[i % MEMBERS],
                trainer_id: trainer_ids[i % TRAINERS],
                room_id: room_ids[i % ROOMS],
                start_time: slot(2, 14),
                end_time: slot(2, 15),
            })
            .await?;
        if i % 4 == 0 {
            sessions.set_status(session.id, SessionStatus::Completed).await?;
        }
    }

    for i in 0..INVOICES {
        let invoice = invoices
            .create(
                CreateInvoice {
                    member_id: member_ids[i % MEMBERS],
                    amount: 49.0 + (i % 5) as f64 * 10.0,
                    description: Some("Monthly membership".to_string()),
                    due_at: Some(slot(14, 0)),
                    mark_paid: false,
                },
                now,
            )
            .await?;
        if i % 3 == 0 {
            invoices.set_status(invoice.id, InvoiceStatus::Paid, now).await?;
        }
    }

    tracing::info!(
        "Seeded {} members, {} trainers, {} rooms and {} classes",
        MEMBERS,
        TRAINERS,
        ROOMS,
        CLASSES
    );
    Ok(true)
}

fn person_name(i: usize) -> String {
    format!(
        "{} {}",
        FIRST_NAMES[i % FIRST_NAMES.len()],
        LAST_NAMES[(i / FIRST_NAMES.len()) % LAST_NAMES.len()]
    )
}
