pub mod alert;
pub mod avatar;
pub mod badge;
pub mod button;
pub mod card;
pub mod input;
pub mod label;
pub mod separator;
pub mod skeleton;
pub mod spinner;
pub mod tooltip;

// Re-export component symbols so callers can `use crate::components::ui::Button` etc.
pub use alert::*;
pub use avatar::*;
pub use badge::*;
pub use button::*;
pub use card::*;
pub use input::*;
pub use label::*;
pub use separator::*;
pub use skeleton::*;
pub use spinner::*;
pub use tooltip::*;
