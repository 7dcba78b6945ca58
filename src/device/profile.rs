//! Device category, pixel density and core count detection
//!
//! Everything is read through an [`EnvironmentProbe`] so a missing capability
//! never fails: each query is optional and falls back to a desktop-class
//! default (pixel ratio 1, 4 cores).

use std::thread;

pub const MOBILE_MAX_WIDTH: f64 = 768.0;
pub const TABLET_MAX_WIDTH: f64 = 1024.0;
pub const LAPTOP_MAX_WIDTH: f64 = 1440.0;

pub const DEFAULT_VIEWPORT: Viewport = Viewport { width: 1920.0, height: 1080.0 };
pub const DEFAULT_PIXEL_RATIO: f64 = 1.0;
pub const DEFAULT_LOGICAL_CORES: usize = 4;
/// Smallest backdrop dot, in device pixels
pub const MIN_BACKDROP_DEVICE_PX: f64 = 0.8;

const MOBILE_AGENTS: [&str; 8] = ["iphone", "ipad", "ipod", "android", "webos", "blackberry", "iemobile", "opera mini"];

/// Logical viewport size in CSS-like pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width * 0.5, self.height * 0.5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceTier {
    Mobile,
    Tablet,
    Laptop,
    Desktop,
}

impl DeviceTier {
    pub fn from_width(width: f64) -> Self {
        if width < MOBILE_MAX_WIDTH {
            DeviceTier::Mobile
        } else if width < TABLET_MAX_WIDTH {
            DeviceTier::Tablet
        } else if width < LAPTOP_MAX_WIDTH {
            DeviceTier::Laptop
        } else {
            DeviceTier::Desktop
        }
    }
}

/// Detected environment. `tier`, `logical_cores`, `pixel_ratio` and
/// `viewport` drive rendering; the touch and platform flags are reported for
/// callers and logging only.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceProfile {
    pub tier: DeviceTier,
    pub is_touch: bool,
    pub pixel_ratio: f64,
    pub logical_cores: usize,
    pub is_ios: bool,
    pub is_android: bool,
    pub viewport: Viewport,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            tier: DeviceTier::Desktop,
            is_touch: false,
            pixel_ratio: DEFAULT_PIXEL_RATIO,
            logical_cores: DEFAULT_LOGICAL_CORES,
            is_ios: false,
            is_android: false,
            viewport: DEFAULT_VIEWPORT,
        }
    }
}

impl DeviceProfile {
    /// Few cores or a phone: run the animation at half rate
    pub fn is_low_power(&self) -> bool {
        self.logical_cores <= 4 || self.tier == DeviceTier::Mobile
    }

    pub fn target_fps(&self) -> f64 {
        if self.is_low_power() { 30.0 } else { 60.0 }
    }

    /// Milliseconds between work-performing frames
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.target_fps()
    }
}

/// Read-only view of the host environment
pub trait EnvironmentProbe {
    /// `false` when there is nothing to draw on
    fn has_surface(&self) -> bool;
    fn viewport(&self) -> Option<Viewport>;
    fn pixel_ratio(&self) -> Option<f64>;
    fn max_touch_points(&self) -> Option<u32>;
    fn user_agent(&self) -> Option<String>;
    fn logical_cores(&self) -> Option<usize>;
}

/// Build a best-effort profile, never failing
pub fn detect(probe: &dyn EnvironmentProbe) -> DeviceProfile {
    let viewport = probe.viewport()
        .filter(|v| v.width > 0.0 && v.height > 0.0)
        .unwrap_or(DEFAULT_VIEWPORT);
    let pixel_ratio = probe.pixel_ratio()
        .filter(|r| r.is_finite() && *r > 0.0)
        .unwrap_or(DEFAULT_PIXEL_RATIO);
    let logical_cores = probe.logical_cores()
        .filter(|c| *c > 0)
        .unwrap_or(DEFAULT_LOGICAL_CORES);
    let is_touch = probe.max_touch_points().map_or(false, |p| p > 0);

    let agent = probe.user_agent().unwrap_or_default().to_lowercase();
    let is_ios = ["iphone", "ipad", "ipod"].iter().any(|a| agent.contains(a));
    let is_android = agent.contains("android");
    let is_mobile_agent = MOBILE_AGENTS.iter().any(|a| agent.contains(a));

    let width_tier = DeviceTier::from_width(viewport.width);
    // a phone user agent wins over a wide viewport up to tablet width
    let tier = if width_tier == DeviceTier::Mobile || (is_mobile_agent && viewport.width < TABLET_MAX_WIDTH) {
        DeviceTier::Mobile
    } else {
        width_tier
    };

    DeviceProfile {
        tier,
        is_touch,
        pixel_ratio,
        logical_cores,
        is_ios,
        is_android,
        viewport,
    }
}

/// Per-tier rendering knobs; the only place where device tier changes behaviour
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTunables {
    pub dot_scale: f64,             // multiplier on every particle radius
    pub frame_interval_ms: f64,
    pub gradient_stops: usize,      // glow gradient stops (2 or 3)
    pub background_dot_size: f64,
    pub background_dot_alpha: f64,  // mean alpha of the backdrop lattice
    pub background_dot_pulse: f64,  // +- alpha pulse of the backdrop lattice
    pub glow_inner: f64,            // glow start as fraction of sphere radius
    pub glow_outer: f64,            // glow end as fraction of sphere radius
    pub glow_alpha: f64,
}

impl RenderTunables {
    pub fn for_profile(profile: &DeviceProfile) -> Self {
        let frame_interval_ms = profile.frame_interval_ms();
        let tunables = match profile.tier {
            DeviceTier::Mobile => Self {
                dot_scale: 1.2,
                frame_interval_ms,
                gradient_stops: 3,
                background_dot_size: 1.2,
                background_dot_alpha: 0.12,
                background_dot_pulse: 0.04,
                glow_inner: 0.75,
                glow_outer: 1.4,
                glow_alpha: 0.25,
            },
            _ => Self {
                dot_scale: 1.0,
                frame_interval_ms,
                gradient_stops: 2,
                background_dot_size: 0.8,
                background_dot_alpha: 0.08,
                background_dot_pulse: 0.03,
                glow_inner: 0.8,
                glow_outer: 1.3,
                glow_alpha: 0.2,
            },
        };
        // low-density screens would round the lattice away
        let min_dot = if profile.pixel_ratio > 0.0 { MIN_BACKDROP_DEVICE_PX / profile.pixel_ratio } else { 0.0 };
        Self { background_dot_size: tunables.background_dot_size.max(min_dot), ..tunables }
    }
}

/// Probe for a native window or headless run: the caller supplies the
/// viewport, cores come from the OS
#[derive(Debug, Clone)]
pub struct NativeProbe {
    pub viewport: Option<Viewport>,
    pub pixel_ratio: Option<f64>,
    pub cores: Option<usize>,
}

impl NativeProbe {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport: Some(viewport),
            pixel_ratio: None,
            cores: None,
        }
    }
}

impl EnvironmentProbe for NativeProbe {
    fn has_surface(&self) -> bool {
        self.viewport.is_some()
    }

    fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    fn pixel_ratio(&self) -> Option<f64> {
        self.pixel_ratio
    }

    fn max_touch_points(&self) -> Option<u32> {
        None
    }

    fn user_agent(&self) -> Option<String> {
        None
    }

    fn logical_cores(&self) -> Option<usize> {
        self.cores.or_else(|| thread::available_parallelism().ok().map(|n| n.get()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Blank;

    impl EnvironmentProbe for Blank {
        fn has_surface(&self) -> bool { false }
        fn viewport(&self) -> Option<Viewport> { None }
        fn pixel_ratio(&self) -> Option<f64> { None }
        fn max_touch_points(&self) -> Option<u32> { None }
        fn user_agent(&self) -> Option<String> { None }
        fn logical_cores(&self) -> Option<usize> { None }
    }

    #[test]
    fn blank_environment_gets_safe_defaults() {
        let p = detect(&Blank);
        assert_eq!(p.tier, DeviceTier::Desktop);
        assert_eq!(p.pixel_ratio, 1.0);
        assert_eq!(p.logical_cores, 4);
        assert!(!p.is_touch);
        // 4 cores is low power
        assert_eq!(p.target_fps(), 30.0);
    }

    #[test]
    fn backdrop_dots_keep_a_device_pixel_floor() {
        let sharp = DeviceProfile { pixel_ratio: 2.0, ..DeviceProfile::default() };
        assert_eq!(RenderTunables::for_profile(&sharp).background_dot_size, 0.8);
        let plain = DeviceProfile::default();
        assert_eq!(RenderTunables::for_profile(&plain).background_dot_size, 0.8);
        let coarse = DeviceProfile { pixel_ratio: 0.5, ..DeviceProfile::default() };
        assert!((RenderTunables::for_profile(&coarse).background_dot_size - 1.6).abs() < 1e-12);
    }

    #[test]
    fn width_thresholds() {
        assert_eq!(DeviceTier::from_width(767.0), DeviceTier::Mobile);
        assert_eq!(DeviceTier::from_width(768.0), DeviceTier::Tablet);
        assert_eq!(DeviceTier::from_width(1023.0), DeviceTier::Tablet);
        assert_eq!(DeviceTier::from_width(1024.0), DeviceTier::Laptop);
        assert_eq!(DeviceTier::from_width(1440.0), DeviceTier::Desktop);
    }
}
