pub mod competitor;
pub mod enrollment;
pub mod exam;
pub mod grade;
pub mod modality;
pub mod settings;
pub mod training;
pub mod user;

pub use competitor::Competitor;
pub use enrollment::{Enrollment, EnrollmentStatus};
pub use exam::{AssessmentType, Exam};
pub use grade::Grade;
pub use modality::{Competence, Modality};
pub use settings::PlatformSettings;
pub use training::{TrainingSession, TrainingStatus, TrainingType};
pub use user::{User, UserRole, UserStatus};
