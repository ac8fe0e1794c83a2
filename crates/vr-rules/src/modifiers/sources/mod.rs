//! The standard modifier sources.
//!
//! | Source        | Reads         | Priority |
//! |---------------|---------------|----------|
//! | `equipment`   | ship          | 10       |
//! | `crew`        | crew          | 20       |
//! | `training`    | character     | 30       |
//! | `research`    | research      | 40       |
//! | `environment` | environment   | 50       |
//! | `consequence` | risk          | 60       |

pub mod consequence;
pub mod crew;
pub mod environment;
pub mod equipment;
pub mod research;
pub mod training;

pub use consequence::ConsequenceSource;
pub use crew::CrewSource;
pub use environment::EnvironmentSource;
pub use equipment::EquipmentSource;
pub use research::ResearchSource;
pub use training::TrainingSource;
