//! Built-in values used to seed and repair migrated documents.

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::config::{ConfigDocument, CURRENT_VERSION};

/// Wallpaper used when no wallpaper state is available.
pub const DEFAULT_WALLPAPER: &str = "~/Pictures/Wallpapers/Autumn-Alley.jpg";

/// Placeholder the shell substitutes with the session user.
pub const USER_PLACEHOLDER: &str = "${USER}";

/// Commands injected when a document does not define them, in order.
///
/// `logout` is handled separately by the fix-up pass.
#[must_use]
pub fn default_commands() -> Vec<(&'static str, Value)> {
    vec![
        ("terminal", json!("kitty")),
        ("browser", json!("firefox")),
        ("fileManager", json!("nemo")),
        ("editor", json!("code")),
        ("shutdown", json!(["systemctl", "poweroff"])),
        ("reboot", json!(["systemctl", "reboot"])),
        ("hibernate", json!(["systemctl", "hibernate"])),
        ("lock", json!(["hyprlock"])),
        ("screenshot", json!(["grimblast", "copy", "area"])),
    ]
}

/// The logout command used when none is configured.
#[must_use]
pub fn default_logout() -> Value {
    json!(["loginctl", "terminate-user", USER_PLACEHOLDER])
}

/// Current time in RFC 3339 UTC, as stored in `metadata`.
#[must_use]
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// A fresh document with every default section.
///
/// `wallpaper` overrides the default current wallpaper.
#[must_use]
pub fn base_document(wallpaper: Option<&str>) -> ConfigDocument {
    let now = timestamp();
    let value = json!({
        "version": CURRENT_VERSION,
        "metadata": {
            "created": now,
            "lastModified": now,
            "profile": "default",
            "migratedFrom": "qml"
        },
        "system": system_defaults(),
        "appearance": {},
        "bar": {},
        "modules": {},
        "services": {},
        "commands": {},
        "wallpaper": wallpaper_defaults(wallpaper.unwrap_or(DEFAULT_WALLPAPER)),
        "hotReload": {
            "enabled": true,
            "debounceMs": 500,
            "validateSchema": true,
            "backupOnChange": true
        }
    });

    match value {
        Value::Object(map) => ConfigDocument::from(map),
        _ => ConfigDocument::new(),
    }
}

fn system_defaults() -> Value {
    json!({
        "startup": {
            "sequence": [
                {"name": "display-init", "delay": 0},
                {"name": "wallpaper-daemon", "delay": 500},
                {"name": "restore-wallpaper", "delay": 1000},
                {"name": "quickshell", "delay": 1500},
                {"name": "docker-desktop", "delay": 2000}
            ],
            "daemons": {
                "wallpaper": "swww-daemon --format xrgb",
                "fallback": "hyprpaper"
            }
        },
        "paths": {
            "state": "~/.local/state/quickshell/user/generated",
            "cache": "~/.cache/quickshell",
            "config": "~/.config/quickshell/heimdall",
            "wallpaperDir": "~/Pictures/Wallpapers",
            "wallpaperState": "~/.local/state/quickshell/user/generated/wallpaper/path.txt"
        },
        "environment": {
            "HEIMDALL_STATE_DIR": "$HOME/.local/state/quickshell/user/generated",
            "QS_CONFIG_NAME": "heimdall",
            "HEIMDALL_BACKEND": "swww"
        }
    })
}

fn wallpaper_defaults(current: &str) -> Value {
    json!({
        "current": current,
        "mode": "fill",
        "transition": {
            "type": "fade",
            "duration": 300
        }
    })
}

/// The complete `appearance` block installed when a document has none.
#[must_use]
pub fn appearance_defaults() -> Value {
    json!({
        "rounding": {
            "scale": 1.0,
            "small": 12,
            "normal": 17,
            "large": 25,
            "full": 1000
        },
        "spacing": {
            "scale": 1.0,
            "small": 7,
            "smaller": 5,
            "normal": 12,
            "larger": 15,
            "large": 20
        },
        "padding": {
            "scale": 1.0,
            "small": 7,
            "smaller": 5,
            "normal": 12,
            "larger": 15,
            "large": 20
        },
        "font": {
            "family": {
                "sans": "IBM Plex Sans",
                "mono": "JetBrains Mono NF",
                "material": "Material Symbols Rounded"
            },
            "size": {
                "scale": 1.0,
                "small": 11,
                "normal": 13,
                "large": 18,
                "extraLarge": 24
            }
        },
        "animation": {
            "curve": {
                "emphasized": [0.05, 0.7, 0.1, 1.0],
                "standard": [0.3, 0.0, 0.8, 0.15],
                "expressive": [0.4, 0.0, 0.2, 1.0]
            },
            "duration": {
                "scale": 1.0,
                "small": 100,
                "normal": 200,
                "large": 400,
                "extraLarge": 600
            }
        },
        "transparency": {
            "enabled": false,
            "base": 0.85,
            "layers": 0.4
        }
    })
}

/// The complete `bar` block installed when a document has none.
#[must_use]
pub fn bar_defaults() -> Value {
    json!({
        "enabled": true,
        "position": "top",
        "height": 30,
        "persistent": true,
        "showOnHover": true,
        "dragThreshold": 30,
        "workspaces": {
            "shown": 5,
            "rounded": true,
            "activeIndicator": true,
            "showLabels": false
        },
        "status": {
            "showAudio": false,
            "showKeyboard": false,
            "showNetwork": true,
            "showBluetooth": true,
            "showBattery": true
        },
        "sizes": {
            "innerHeight": 30,
            "previewHeight": 200,
            "menuWidth": 400
        }
    })
}
