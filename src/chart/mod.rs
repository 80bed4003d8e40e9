// Plot-coordinate projectors: contact-point views and the spray chart.

pub mod contact;
pub mod spray;
