pub mod icons;
pub mod signal_indicator;
