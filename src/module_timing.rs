use embassy_time::Duration;

/// Default bound for short query and configuration commands
pub const fn command_default() -> Duration {
    Duration::from_secs(3)
}

/// PDP context configuration and activation on Samsung modems
pub const fn samsung_pdp() -> Duration {
    Duration::from_secs(60)
}

/// Cinterion `^SMSO` switch-off command
pub const fn switch_off() -> Duration {
    Duration::from_secs(5)
}

/// Radio low power command issued while powering down
pub const fn sleep_mode() -> Duration {
    Duration::from_secs(5)
}

/// `^SWWAN=?` and `+GTRNDIS=?` support queries
pub const fn wwan_support_query() -> Duration {
    Duration::from_secs(6)
}

/// Band selection through `^SCFG="Radio/Band"`
pub const fn band_selection() -> Duration {
    Duration::from_secs(15)
}

/// Operator selection issued as part of a mode change
pub const fn operator_selection() -> Duration {
    Duration::from_secs(20)
}

/// Operator selection issued as network registration
pub const fn network_registration() -> Duration {
    Duration::from_secs(120)
}

/// `+CGACT`, XMM data channel and data mode commands
pub const fn data_channel() -> Duration {
    Duration::from_secs(10)
}

/// Functionality changes (`+CFUN`)
pub const fn functionality() -> Duration {
    Duration::from_secs(180)
}
