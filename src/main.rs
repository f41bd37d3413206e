use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fitclub::config::Config;
use fitclub::handlers::{classes, invoices, members, rooms, sessions, trainers};
use fitclub::migrations::run_migrations;
use fitclub::repositories::{
    ClassRepository, DashboardRepository, InvoiceRepository, MemberRepository, ProgressRepository,
    RoomRepository, SessionRepository, TrainerRepository,
};
use fitclub::{db, routes, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fitclub=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database: {}", config.database_url);
    let pool = db::create_pool(&config.database_url)?;

    run_migrations(&pool)?;

    if config.seed_demo_data {
        let now = chrono::Local::now().naive_local();
        if seed::seed_data(&pool, now).await? {
            tracing::info!("Demo data loaded");
        }
    }

    // Repositories
    let member_repo = MemberRepository::new(pool.clone());
    let trainer_repo = TrainerRepository::new(pool.clone());
    let room_repo = RoomRepository::new(pool.clone());
    let class_repo = ClassRepository::new(pool.clone());
    let session_repo = SessionRepository::new(pool.clone());
    let progress_repo = ProgressRepository::new(pool.clone());
    let invoice_repo = InvoiceRepository::new(pool.clone());
    let dashboard_repo = DashboardRepository::new(pool.clone());

    // Handler states
    let members_state = members::MembersState {
        member_repo,
        dashboard_repo,
        progress_repo,
        class_repo: class_repo.clone(),
        invoice_repo: invoice_repo.clone(),
    };
    let trainers_state = trainers::TrainersState { trainer_repo };
    let rooms_state = rooms::RoomsState { room_repo };
    let classes_state = classes::ClassesState { class_repo };
    let sessions_state = sessions::SessionsState { session_repo };
    let invoices_state = invoices::InvoicesState { invoice_repo };

    let app = routes::create_router(
        pool,
        members_state,
        trainers_state,
        rooms_state,
        classes_state,
        sessions_state,
        invoices_state,
    );

    let addr = config.server_addr();
    tracing::info!("Starting server at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
