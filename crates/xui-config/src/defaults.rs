//! Default value functions for serde deserialization.
//!
//! These functions forward to constants defined in `xui_core::defaults`.

use xui_core::defaults;

/// Generate default value functions that forward to xui_core::defaults constants.
macro_rules! default_fns {
    // For Copy types (integers, bool, etc.)
    ($($fn_name:ident => $const_name:ident : $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> $ty {
                defaults::$const_name
            }
        )*
    };
}

/// Generate default value functions that return String from &str constants.
macro_rules! default_string_fns {
    ($($fn_name:ident => $const_name:ident),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> String {
                defaults::$const_name.to_string()
            }
        )*
    };
}

default_fns! {
    default_show_info        => DEFAULT_SHOW_INFO: bool,
    default_password_length  => DEFAULT_PASSWORD_LENGTH: usize,
    default_sub_id_length    => DEFAULT_SUB_ID_LENGTH: usize,
}

default_string_fns! {
    default_link_address     => DEFAULT_LINK_ADDRESS,
    default_remark_separator => DEFAULT_REMARK_SEPARATOR,
}
