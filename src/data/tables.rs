//! Static market-share and hardware tables behind the default network.
//!
//! Loaded once into the immutable default `NetworkDefinition` at engine
//! construction; the online learner mutates the network's distributions,
//! never these tables. Shares are rough 2024–2025 figures; every weight
//! list sums to 1.0 exactly.
//!
//! Conditional tables are keyed by full condition-key strings
//! (`parent=value|parent=value`, parents sorted by name) so the table
//! rows line up with what the sampler computes at draw time.

/// Browser market shares.
pub const BROWSER_SHARES: &[(&str, f64)] = &[
    ("chrome", 0.65),
    ("safari", 0.18),
    ("edge", 0.09),
    ("firefox", 0.08),
];

pub const CHROME_VERSIONS: &[(&str, f64)] = &[
    ("131.0.6778.85", 0.34),
    ("130.0.6723.117", 0.26),
    ("129.0.6668.100", 0.18),
    ("128.0.6613.138", 0.12),
    ("127.0.6533.120", 0.10),
];

pub const EDGE_VERSIONS: &[(&str, f64)] = &[
    ("131.0.2903.86", 0.40),
    ("130.0.2849.80", 0.30),
    ("129.0.2792.89", 0.20),
    ("128.0.2739.67", 0.10),
];

pub const FIREFOX_VERSIONS: &[(&str, f64)] = &[
    ("133.0", 0.35),
    ("132.0", 0.30),
    ("131.0", 0.20),
    ("130.0", 0.15),
];

pub const SAFARI_VERSIONS: &[(&str, f64)] = &[
    ("17.6", 0.45),
    ("17.5", 0.35),
    ("17.4", 0.20),
];

/// Version lists per browser (keys are `browser=<name>` condition keys).
pub const VERSION_SHARES: &[(&str, &[(&str, f64)])] = &[
    ("browser=chrome", CHROME_VERSIONS),
    ("browser=edge", EDGE_VERSIONS),
    ("browser=firefox", FIREFOX_VERSIONS),
    ("browser=safari", SAFARI_VERSIONS),
];

/// Device-type split per browser.
pub const DEVICE_SHARES: &[(&str, &[(&str, f64)])] = &[
    (
        "browser=chrome",
        &[("desktop", 0.62), ("mobile", 0.34), ("tablet", 0.04)],
    ),
    (
        "browser=safari",
        &[("desktop", 0.35), ("mobile", 0.58), ("tablet", 0.07)],
    ),
    (
        "browser=edge",
        &[("desktop", 0.92), ("mobile", 0.07), ("tablet", 0.01)],
    ),
    (
        "browser=firefox",
        &[("desktop", 0.88), ("mobile", 0.10), ("tablet", 0.02)],
    ),
];

pub const DEVICE_SHARES_DEFAULT: &[(&str, f64)] =
    &[("desktop", 0.60), ("mobile", 0.35), ("tablet", 0.05)];

/// Platform split per browser/device combination. Safari never leaves
/// Apple platforms; mobile rows never produce desktop operating systems.
pub const PLATFORM_SHARES: &[(&str, &[(&str, f64)])] = &[
    (
        "browser=chrome|device_type=desktop",
        &[("windows", 0.70), ("macos", 0.17), ("linux", 0.13)],
    ),
    (
        "browser=chrome|device_type=mobile",
        &[("android", 0.82), ("ios", 0.18)],
    ),
    (
        "browser=chrome|device_type=tablet",
        &[("android", 0.55), ("ios", 0.45)],
    ),
    ("browser=safari|device_type=desktop", &[("macos", 1.0)]),
    ("browser=safari|device_type=mobile", &[("ios", 1.0)]),
    ("browser=safari|device_type=tablet", &[("ios", 1.0)]),
    (
        "browser=edge|device_type=desktop",
        &[("windows", 0.90), ("macos", 0.08), ("linux", 0.02)],
    ),
    (
        "browser=edge|device_type=mobile",
        &[("android", 0.85), ("ios", 0.15)],
    ),
    (
        "browser=edge|device_type=tablet",
        &[("android", 0.70), ("ios", 0.30)],
    ),
    (
        "browser=firefox|device_type=desktop",
        &[("windows", 0.72), ("linux", 0.16), ("macos", 0.12)],
    ),
    (
        "browser=firefox|device_type=mobile",
        &[("android", 0.95), ("ios", 0.05)],
    ),
    ("browser=firefox|device_type=tablet", &[("android", 1.0)]),
];

pub const PLATFORM_SHARES_DEFAULT: &[(&str, f64)] = &[
    ("windows", 0.60),
    ("macos", 0.20),
    ("linux", 0.10),
    ("android", 0.07),
    ("ios", 0.03),
];

/// Screen resolutions per device/platform combination. Mobile rows carry
/// only portrait phone geometries, so a mobile sample can never yield a
/// desktop-only resolution.
pub const SCREEN_SHARES: &[(&str, &[(&str, f64)])] = &[
    (
        "device_type=desktop|platform=windows",
        &[
            ("1920x1080", 0.42),
            ("2560x1440", 0.18),
            ("1366x768", 0.16),
            ("1536x864", 0.14),
            ("3840x2160", 0.10),
        ],
    ),
    (
        "device_type=desktop|platform=macos",
        &[
            ("2560x1600", 0.38),
            ("2880x1800", 0.30),
            ("1920x1080", 0.18),
            ("3024x1964", 0.14),
        ],
    ),
    (
        "device_type=desktop|platform=linux",
        &[("1920x1080", 0.55), ("2560x1440", 0.25), ("1366x768", 0.20)],
    ),
    (
        "device_type=mobile|platform=android",
        &[
            ("412x915", 0.32),
            ("393x873", 0.28),
            ("360x800", 0.24),
            ("384x854", 0.16),
        ],
    ),
    (
        "device_type=mobile|platform=ios",
        &[
            ("390x844", 0.34),
            ("393x852", 0.28),
            ("430x932", 0.22),
            ("375x812", 0.16),
        ],
    ),
    (
        "device_type=tablet|platform=android",
        &[("800x1280", 0.55), ("1280x800", 0.45)],
    ),
    (
        "device_type=tablet|platform=ios",
        &[("820x1180", 0.44), ("834x1194", 0.32), ("1024x1366", 0.24)],
    ),
];

pub const SCREEN_SHARES_DEFAULT: &[(&str, f64)] = &[("1920x1080", 0.60), ("1366x768", 0.40)];

/// Device memory (GB, as categorical strings) per device type.
pub const MEMORY_SHARES: &[(&str, &[(&str, f64)])] = &[
    (
        "device_type=desktop",
        &[("8", 0.45), ("16", 0.30), ("32", 0.15), ("4", 0.10)],
    ),
    (
        "device_type=mobile",
        &[("4", 0.40), ("6", 0.25), ("8", 0.25), ("12", 0.10)],
    ),
    (
        "device_type=tablet",
        &[("4", 0.50), ("8", 0.35), ("6", 0.15)],
    ),
];

pub const MEMORY_SHARES_DEFAULT: &[(&str, f64)] = &[("8", 0.60), ("16", 0.40)];

/// Touch capability per device type.
pub const TOUCH_SHARES: &[(&str, &[(&str, f64)])] = &[
    ("device_type=desktop", &[("false", 0.92), ("true", 0.08)]),
    ("device_type=mobile", &[("true", 0.99), ("false", 0.01)]),
    ("device_type=tablet", &[("true", 0.97), ("false", 0.03)]),
];

pub const TOUCH_SHARES_DEFAULT: &[(&str, f64)] = &[("false", 0.70), ("true", 0.30)];

pub const REGION_SHARES: &[(&str, f64)] = &[
    ("americas", 0.38),
    ("europe", 0.34),
    ("asia_pacific", 0.28),
];

pub const LOCALE_SHARES: &[(&str, &[(&str, f64)])] = &[
    (
        "region=americas",
        &[
            ("en-US", 0.62),
            ("pt-BR", 0.14),
            ("es-MX", 0.12),
            ("en-CA", 0.06),
            ("fr-CA", 0.06),
        ],
    ),
    (
        "region=europe",
        &[
            ("en-GB", 0.26),
            ("de-DE", 0.22),
            ("fr-FR", 0.18),
            ("es-ES", 0.12),
            ("it-IT", 0.10),
            ("pl-PL", 0.07),
            ("nl-NL", 0.05),
        ],
    ),
    (
        "region=asia_pacific",
        &[
            ("ja-JP", 0.28),
            ("zh-CN", 0.26),
            ("en-AU", 0.12),
            ("ko-KR", 0.12),
            ("en-IN", 0.12),
            ("hi-IN", 0.10),
        ],
    ),
];

pub const LOCALE_SHARES_DEFAULT: &[(&str, f64)] = &[("en-US", 0.80), ("en-GB", 0.20)];

pub const TIMEZONE_SHARES: &[(&str, &[(&str, f64)])] = &[
    (
        "region=americas",
        &[
            ("America/New_York", 0.34),
            ("America/Los_Angeles", 0.22),
            ("America/Chicago", 0.20),
            ("America/Sao_Paulo", 0.14),
            ("America/Mexico_City", 0.10),
        ],
    ),
    (
        "region=europe",
        &[
            ("Europe/London", 0.30),
            ("Europe/Berlin", 0.24),
            ("Europe/Paris", 0.18),
            ("Europe/Madrid", 0.12),
            ("Europe/Warsaw", 0.09),
            ("Europe/Amsterdam", 0.07),
        ],
    ),
    (
        "region=asia_pacific",
        &[
            ("Asia/Tokyo", 0.30),
            ("Asia/Shanghai", 0.26),
            ("Asia/Kolkata", 0.18),
            ("Australia/Sydney", 0.14),
            ("Asia/Seoul", 0.12),
        ],
    ),
];

pub const TIMEZONE_SHARES_DEFAULT: &[(&str, f64)] =
    &[("America/New_York", 0.50), ("Europe/London", 0.50)];

/// Timezone name, standard UTC offset in minutes, whether DST is observed.
pub const TIMEZONE_TABLE: &[(&str, i32, bool)] = &[
    ("America/New_York", -300, true),
    ("America/Chicago", -360, true),
    ("America/Los_Angeles", -480, true),
    ("America/Sao_Paulo", -180, false),
    ("America/Mexico_City", -360, false),
    ("Europe/London", 0, true),
    ("Europe/Berlin", 60, true),
    ("Europe/Paris", 60, true),
    ("Europe/Madrid", 60, true),
    ("Europe/Warsaw", 60, true),
    ("Europe/Amsterdam", 60, true),
    ("Asia/Tokyo", 540, false),
    ("Asia/Shanghai", 480, false),
    ("Asia/Kolkata", 330, false),
    ("Asia/Seoul", 540, false),
    ("Australia/Sydney", 600, true),
];

pub const GPU_VENDOR_SHARES: &[(&str, &[(&str, f64)])] = &[
    (
        "platform=windows",
        &[("NVIDIA", 0.48), ("AMD", 0.27), ("Intel", 0.25)],
    ),
    ("platform=macos", &[("Apple", 1.0)]),
    (
        "platform=linux",
        &[("NVIDIA", 0.40), ("AMD", 0.32), ("Intel", 0.28)],
    ),
    (
        "platform=android",
        &[("Qualcomm", 0.55), ("ARM", 0.30), ("Samsung", 0.15)],
    ),
    ("platform=ios", &[("Apple", 1.0)]),
];

pub const GPU_VENDOR_SHARES_DEFAULT: &[(&str, f64)] = &[("Intel", 1.0)];

pub const GPU_MODEL_SHARES: &[(&str, &[(&str, f64)])] = &[
    (
        "gpu_vendor=NVIDIA",
        &[
            ("GeForce RTX 4060", 0.40),
            ("GeForce RTX 3060", 0.35),
            ("GeForce GTX 1650", 0.25),
        ],
    ),
    (
        "gpu_vendor=AMD",
        &[("Radeon RX 7600", 0.55), ("Radeon RX 6600", 0.45)],
    ),
    (
        "gpu_vendor=Intel",
        &[("Iris Xe Graphics", 0.60), ("UHD Graphics 630", 0.40)],
    ),
    (
        "gpu_vendor=Apple",
        &[("Apple M3", 0.40), ("Apple M2", 0.35), ("Apple M1", 0.25)],
    ),
    (
        "gpu_vendor=Qualcomm",
        &[("Adreno 740", 0.55), ("Adreno 730", 0.45)],
    ),
    (
        "gpu_vendor=ARM",
        &[("Mali-G78", 0.50), ("Mali-G710", 0.50)],
    ),
    ("gpu_vendor=Samsung", &[("Xclipse 920", 1.0)]),
];

pub const GPU_MODEL_SHARES_DEFAULT: &[(&str, f64)] = &[("Generic GPU", 1.0)];

pub const HTTP_SHARES: &[(&str, &[(&str, f64)])] = &[
    (
        "browser=chrome",
        &[("2", 0.55), ("3", 0.35), ("1.1", 0.10)],
    ),
    ("browser=edge", &[("2", 0.55), ("3", 0.35), ("1.1", 0.10)]),
    (
        "browser=firefox",
        &[("2", 0.60), ("3", 0.25), ("1.1", 0.15)],
    ),
    (
        "browser=safari",
        &[("2", 0.70), ("3", 0.20), ("1.1", 0.10)],
    ),
];

pub const HTTP_SHARES_DEFAULT: &[(&str, f64)] = &[("2", 0.70), ("1.1", 0.30)];

/// Gaussian parameters: (condition key, mean, variance, min, max).
/// All numeric nodes round their draws.
pub const CONCURRENCY_PARAMS: &[(&str, f64, f64, f64, f64)] = &[
    ("device_type=desktop", 9.0, 16.0, 2.0, 32.0),
    ("device_type=mobile", 6.0, 4.0, 2.0, 12.0),
    ("device_type=tablet", 5.0, 2.0, 2.0, 10.0),
];

pub const CONCURRENCY_PARAMS_DEFAULT: (f64, f64, f64, f64) = (8.0, 9.0, 1.0, 32.0);

pub const PLUGIN_PARAMS: &[(&str, f64, f64, f64, f64)] = &[
    ("browser=chrome", 5.0, 1.0, 0.0, 10.0),
    ("browser=edge", 5.0, 1.0, 0.0, 10.0),
    ("browser=firefox", 3.0, 1.0, 0.0, 8.0),
    ("browser=safari", 2.0, 1.0, 0.0, 6.0),
];

pub const PLUGIN_PARAMS_DEFAULT: (f64, f64, f64, f64) = (4.0, 2.0, 0.0, 10.0);

pub const MEDIA_DEVICE_PARAMS: &[(&str, f64, f64, f64, f64)] = &[
    ("device_type=desktop", 4.0, 2.0, 0.0, 12.0),
    ("device_type=mobile", 3.0, 1.0, 0.0, 8.0),
    ("device_type=tablet", 3.0, 1.0, 0.0, 8.0),
];

pub const MEDIA_DEVICE_PARAMS_DEFAULT: (f64, f64, f64, f64) = (3.0, 2.0, 0.0, 10.0);

/// Cookie-jar size for a lived-in profile: mean, variance, min, max.
pub const COOKIE_PARAMS: (f64, f64, f64, f64) = (38.0, 400.0, 0.0, 200.0);
