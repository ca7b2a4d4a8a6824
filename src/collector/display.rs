//! Identity, display and time collectors.

use super::available;
use super::types::{
    BrowserRecord, DeviceRecord, LocationRecord, ScreenRecord, TimeRecord, WindowRecord,
};
use crate::env::{EnvironmentProvider, HostApi};
use chrono::Offset;
use chrono::TimeZone;
use chrono_tz::Tz;

pub fn collect_browser(env: &dyn EnvironmentProvider) -> BrowserRecord {
    let Some(nav) = available("navigator", env.navigator()) else {
        return BrowserRecord::default();
    };

    BrowserRecord {
        user_agent: nav.user_agent,
        language: nav.language,
        languages: nav.languages,
        cookie_enabled: nav.cookie_enabled,
        do_not_track: nav.do_not_track,
        on_line: nav.on_line,
        platform: nav.platform,
        vendor: nav.vendor,
    }
}

pub fn collect_screen(env: &dyn EnvironmentProvider) -> ScreenRecord {
    let Some(screen) = available("screen", env.screen()) else {
        return ScreenRecord::default();
    };

    ScreenRecord {
        width: Some(screen.width),
        height: Some(screen.height),
        avail_width: Some(screen.avail_width),
        avail_height: Some(screen.avail_height),
        color_depth: Some(screen.color_depth),
        pixel_depth: Some(screen.pixel_depth),
        orientation: screen.orientation,
    }
}

pub fn collect_window(env: &dyn EnvironmentProvider) -> WindowRecord {
    let Some(viewport) = available("window", env.viewport()) else {
        return WindowRecord::default();
    };

    WindowRecord {
        inner_width: Some(viewport.inner_width),
        inner_height: Some(viewport.inner_height),
        outer_width: Some(viewport.outer_width),
        outer_height: Some(viewport.outer_height),
        device_pixel_ratio: Some(viewport.device_pixel_ratio),
        screen_x: Some(viewport.screen_x),
        screen_y: Some(viewport.screen_y),
    }
}

pub fn collect_location(env: &dyn EnvironmentProvider) -> LocationRecord {
    let Some(location) = available("location", env.location()) else {
        return LocationRecord::default();
    };

    LocationRecord {
        href: Some(location.href),
        origin: Some(location.origin),
        protocol: Some(location.protocol),
        host: Some(location.host),
        hostname: Some(location.hostname),
        port: Some(location.port),
        pathname: Some(location.pathname),
        search: Some(location.search),
        hash: Some(location.hash),
    }
}

/// Timezone name and offset at the host's current time.
///
/// The offset follows the `getTimezoneOffset` convention: minutes to add
/// to local time to reach UTC. It is absent when the name is not a known
/// IANA zone.
pub fn collect_time(env: &dyn EnvironmentProvider) -> TimeRecord {
    let now = env.now();
    let timezone = available("timezone", env.timezone()).filter(|name| !name.is_empty());
    let timezone_offset = timezone
        .as_deref()
        .and_then(|name| name.parse::<Tz>().ok())
        .map(|tz| {
            let local_minus_utc = tz
                .offset_from_utc_datetime(&now.naive_utc())
                .fix()
                .local_minus_utc();
            -local_minus_utc / 60
        });

    TimeRecord {
        timezone,
        timezone_offset,
        current_time: now,
        timestamp: now.timestamp_millis(),
    }
}

pub fn collect_device(env: &dyn EnvironmentProvider) -> DeviceRecord {
    let screen = available("screen", env.screen());
    let viewport = available("window", env.viewport());
    let touch_points = available("navigator", env.navigator())
        .and_then(|nav| nav.max_touch_points)
        .unwrap_or(0);

    DeviceRecord {
        device_pixel_ratio: viewport.map(|v| v.device_pixel_ratio),
        color_depth: screen.as_ref().map(|s| s.color_depth),
        pixel_depth: screen.as_ref().map(|s| s.pixel_depth),
        screen_orientation: screen.and_then(|s| s.orientation),
        device_orientation: env.has_api(HostApi::DeviceOrientationEvent),
        device_motion: env.has_api(HostApi::DeviceMotionEvent),
        max_touch_points: touch_points,
        touch_support: env.has_api(HostApi::TouchEvents),
        pointer_support: env.has_api(HostApi::PointerEvents),
        hover_support: available("matchMedia", env.media_query("(hover: hover)")).unwrap_or(false),
    }
}
