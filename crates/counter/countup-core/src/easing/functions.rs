//! Built-in easing curves.
//!
//! Progress-shaped curves map p in [0,1] to an eased p. Raw-time curves take
//! `(t, b, c, d)` = (elapsed, start, delta, duration) and return the value
//! itself, following Robert Penner's equations.

use std::f64::consts::PI;

pub type ProgressSig = fn(f64) -> f64;
pub type RawTimeSig = fn(f64, f64, f64, f64) -> f64;

const BACK_S: f64 = 1.70158;

#[inline]
pub fn linear(p: f64) -> f64 {
    p
}

/// Half-cosine curve used as the default "swing".
#[inline]
pub fn swing(p: f64) -> f64 {
    0.5 - (p * PI).cos() / 2.0
}

pub const PROGRESS: &[(&str, ProgressSig)] = &[
    ("linear", linear),
    ("swing", swing),
    ("jswing", swing),
];

pub const RAW_TIME: &[(&str, RawTimeSig)] = &[
    ("easeInQuad", ease_in_quad),
    ("easeOutQuad", ease_out_quad),
    ("easeInOutQuad", ease_in_out_quad),
    ("easeInCubic", ease_in_cubic),
    ("easeOutCubic", ease_out_cubic),
    ("easeInOutCubic", ease_in_out_cubic),
    ("easeInQuart", ease_in_quart),
    ("easeOutQuart", ease_out_quart),
    ("easeInOutQuart", ease_in_out_quart),
    ("easeInQuint", ease_in_quint),
    ("easeOutQuint", ease_out_quint),
    ("easeInOutQuint", ease_in_out_quint),
    ("easeInSine", ease_in_sine),
    ("easeOutSine", ease_out_sine),
    ("easeInOutSine", ease_in_out_sine),
    ("easeInExpo", ease_in_expo),
    ("easeOutExpo", ease_out_expo),
    ("easeInOutExpo", ease_in_out_expo),
    ("easeInCirc", ease_in_circ),
    ("easeOutCirc", ease_out_circ),
    ("easeInOutCirc", ease_in_out_circ),
    ("easeInElastic", ease_in_elastic),
    ("easeOutElastic", ease_out_elastic),
    ("easeInOutElastic", ease_in_out_elastic),
    ("easeInBack", ease_in_back),
    ("easeOutBack", ease_out_back),
    ("easeInOutBack", ease_in_out_back),
    ("easeInBounce", ease_in_bounce),
    ("easeOutBounce", ease_out_bounce),
    ("easeInOutBounce", ease_in_out_bounce),
];

pub fn ease_in_quad(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t * t + b
}

pub fn ease_out_quad(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    -c * t * (t - 2.0) + b
}

pub fn ease_in_out_quad(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t * t + b;
    }
    let t = t - 1.0;
    -c / 2.0 * (t * (t - 2.0) - 1.0) + b
}

pub fn ease_in_cubic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t * t * t + b
}

pub fn ease_out_cubic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    c * (t * t * t + 1.0) + b
}

pub fn ease_in_out_cubic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t * t * t + b;
    }
    let t = t - 2.0;
    c / 2.0 * (t * t * t + 2.0) + b
}

pub fn ease_in_quart(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t.powi(4) + b
}

pub fn ease_out_quart(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    -c * (t.powi(4) - 1.0) + b
}

pub fn ease_in_out_quart(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t.powi(4) + b;
    }
    let t = t - 2.0;
    -c / 2.0 * (t.powi(4) - 2.0) + b
}

pub fn ease_in_quint(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t.powi(5) + b
}

pub fn ease_out_quint(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    c * (t.powi(5) + 1.0) + b
}

pub fn ease_in_out_quint(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t.powi(5) + b;
    }
    let t = t - 2.0;
    c / 2.0 * (t.powi(5) + 2.0) + b
}

pub fn ease_in_sine(t: f64, b: f64, c: f64, d: f64) -> f64 {
    -c * (t / d * (PI / 2.0)).cos() + c + b
}

pub fn ease_out_sine(t: f64, b: f64, c: f64, d: f64) -> f64 {
    c * (t / d * (PI / 2.0)).sin() + b
}

pub fn ease_in_out_sine(t: f64, b: f64, c: f64, d: f64) -> f64 {
    -c / 2.0 * ((PI * t / d).cos() - 1.0) + b
}

pub fn ease_in_expo(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == 0.0 {
        b
    } else {
        c * 2f64.powf(10.0 * (t / d - 1.0)) + b
    }
}

pub fn ease_out_expo(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == d {
        b + c
    } else {
        c * (1.0 - 2f64.powf(-10.0 * t / d)) + b
    }
}

pub fn ease_in_out_expo(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == 0.0 {
        return b;
    }
    if t == d {
        return b + c;
    }
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * 2f64.powf(10.0 * (t - 1.0)) + b;
    }
    c / 2.0 * (2.0 - 2f64.powf(-10.0 * (t - 1.0))) + b
}

pub fn ease_in_circ(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    -c * ((1.0 - t * t).sqrt() - 1.0) + b
}

pub fn ease_out_circ(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    c * (1.0 - t * t).sqrt() + b
}

pub fn ease_in_out_circ(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        return -c / 2.0 * ((1.0 - t * t).sqrt() - 1.0) + b;
    }
    let t = t - 2.0;
    c / 2.0 * ((1.0 - t * t).sqrt() + 1.0) + b
}

// Amplitude equals the delta, so the phase shift reduces to a quarter period.

pub fn ease_in_elastic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == 0.0 {
        return b;
    }
    let t = t / d;
    if t == 1.0 {
        return b + c;
    }
    let p = d * 0.3;
    let s = p / 4.0;
    let t = t - 1.0;
    -(c * 2f64.powf(10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin()) + b
}

pub fn ease_out_elastic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == 0.0 {
        return b;
    }
    let t = t / d;
    if t == 1.0 {
        return b + c;
    }
    let p = d * 0.3;
    let s = p / 4.0;
    c * 2f64.powf(-10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin() + c + b
}

pub fn ease_in_out_elastic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t == 0.0 {
        return b;
    }
    let t = t / (d / 2.0);
    if t == 2.0 {
        return b + c;
    }
    let p = d * (0.3 * 1.5);
    let s = p / 4.0;
    let t = t - 1.0;
    let wave = ((t * d - s) * (2.0 * PI) / p).sin();
    if t < 0.0 {
        -0.5 * (c * 2f64.powf(10.0 * t) * wave) + b
    } else {
        c * 2f64.powf(-10.0 * t) * wave * 0.5 + c + b
    }
}

pub fn ease_in_back(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t * t * ((BACK_S + 1.0) * t - BACK_S) + b
}

pub fn ease_out_back(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d - 1.0;
    c * (t * t * ((BACK_S + 1.0) * t + BACK_S) + 1.0) + b
}

pub fn ease_in_out_back(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let s = BACK_S * 1.525;
    let t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * (t * t * ((s + 1.0) * t - s)) + b;
    }
    let t = t - 2.0;
    c / 2.0 * (t * t * ((s + 1.0) * t + s) + 2.0) + b
}

pub fn ease_out_bounce(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    if t < 1.0 / 2.75 {
        c * (7.5625 * t * t) + b
    } else if t < 2.0 / 2.75 {
        let t = t - 1.5 / 2.75;
        c * (7.5625 * t * t + 0.75) + b
    } else if t < 2.5 / 2.75 {
        let t = t - 2.25 / 2.75;
        c * (7.5625 * t * t + 0.9375) + b
    } else {
        let t = t - 2.625 / 2.75;
        c * (7.5625 * t * t + 0.984375) + b
    }
}

pub fn ease_in_bounce(t: f64, b: f64, c: f64, d: f64) -> f64 {
    c - ease_out_bounce(d - t, 0.0, c, d) + b
}

pub fn ease_in_out_bounce(t: f64, b: f64, c: f64, d: f64) -> f64 {
    if t < d / 2.0 {
        ease_in_bounce(t * 2.0, 0.0, c, d) * 0.5 + b
    } else {
        ease_out_bounce(t * 2.0 - d, 0.0, c, d) * 0.5 + c * 0.5 + b
    }
}
