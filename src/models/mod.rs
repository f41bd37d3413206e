pub mod dashboard;
pub mod fitness_class;
pub mod from_row;
pub mod goal;
pub mod health_metric;
pub mod invoice;
pub mod member;
pub mod pt_session;
pub mod room;
pub mod trainer;

pub use dashboard::{GoalSummary, MemberDashboard, MetricSummary, TrainerSchedule};
pub use fitness_class::{ClassRegistration, ClassRequest, CreateRegistration, FitnessClass};
pub use from_row::FromSqliteRow;
pub use goal::{CreateGoal, FitnessGoal};
pub use health_metric::{CreateHealthMetric, HealthMetric};
pub use invoice::{CreateInvoice, Invoice, InvoiceStatus, UpdateInvoiceStatus};
pub use member::{CreateMember, Member, UpdateMember};
pub use pt_session::{
    CreatePtSession, PtSession, ReschedulePtSession, SessionStatus, UpdateSessionStatus,
};
pub use room::{CreateRoom, Room};
pub use trainer::{CreateAvailability, CreateTrainer, Trainer, TrainerAvailability};
