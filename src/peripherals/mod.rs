//! Hardware drivers of the PineTime used by the watchface

pub(crate) mod backlight;
pub(crate) mod battery;
pub(crate) mod button;
pub(crate) mod display;
pub(crate) mod vibrator;
