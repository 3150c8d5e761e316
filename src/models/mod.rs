pub mod de;
pub mod log;
pub mod network;
pub mod partner;
pub mod profile;
pub mod user;

pub use log::{FcmLog, SmsLog};
pub use network::{Country, NewNetwork};
pub use partner::{Partner, PartnerStats};
pub use profile::{Profile, ProfileUpdate};
pub use user::{BulkAction, BulkActionKind, MutationReply, NewUser, User, UserFlag};
