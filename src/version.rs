mod build_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Returns the main version identifier, e.g. `v0.1.0`.
pub(crate) fn identifier() -> String {
    format!("v{}", build_info::PKG_VERSION)
}

/// Returns an RFC 2822 formatted date of the build time in UTC.
pub(crate) fn build_time_utc() -> &'static str {
    build_info::BUILT_TIME_UTC
}

/// Returns a string containing all version-related information.
pub(crate) fn full() -> String {
    format!("{} ({} build), built {}", identifier(), build_info::PROFILE, build_time_utc())
}
