mod alert;
mod button;
mod card;
mod input;
mod label;
mod spinner;

#[allow(unused_imports)]
pub use alert::*;
#[allow(unused_imports)]
pub use button::*;
#[allow(unused_imports)]
pub use card::*;
#[allow(unused_imports)]
pub use input::*;
#[allow(unused_imports)]
pub use label::*;
#[allow(unused_imports)]
pub use spinner::*;
