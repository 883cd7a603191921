pub mod spinner;
pub mod text_field;
pub mod toast;

pub use spinner::Spinner;
pub use text_field::TextField;
pub use toast::{Toast, ToastManager};
