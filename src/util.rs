/// Checks that a numerical value lies in the provided interval and returns early with
/// [`ConfigError::Interval`](crate::error::ConfigError::Interval) if not
///
/// Two interval shapes are supported: closed `a ..= b` and left-open `a <..= b`.
///
/// ### Example
/// ```ignore
/// let alpha = 2.0;
/// ensure_interval!(alpha, 0.0 <..= 1.0);
/// ```
/// This returns the error "invalid value for \`alpha\`: 2 is not in the interval (0.0, 1.0]".
#[macro_export]
macro_rules! ensure_interval {
    ($var:ident, $a:literal ..= $b:literal) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::error::ConfigError::Interval {
                name: stringify!($var),
                value: $var,
                interval: concat!("[", stringify!($a), ", ", stringify!($b), "]"),
            });
        }
    };
    ($var:ident, $a:literal <..= $b:literal) => {
        if !($var > $a && $var <= $b) {
            return Err($crate::error::ConfigError::Interval {
                name: stringify!($var),
                value: $var,
                interval: concat!("(", stringify!($a), ", ", stringify!($b), "]"),
            });
        }
    };
}
