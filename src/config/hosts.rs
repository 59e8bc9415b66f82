//! Default hostname list.
//!
//! The hundred most queried domains. Every provider resolves the same list
//! in the same order.

/// Hostnames resolved against every provider address.
pub const DEFAULT_HOSTNAMES: &[&str] = &[
    "google.com",
    "root-servers.net",
    "googleapis.com",
    "apple.com",
    "gstatic.com",
    "cloudflare.com",
    "facebook.com",
    "tiktokcdn.com",
    "microsoft.com",
    "amazonaws.com",
    "googlevideo.com",
    "fbcdn.net",
    "whatsapp.net",
    "doubleclick.net",
    "youtube.com",
    "instagram.com",
    "apple-dns.net",
    "icloud.com",
    "akadns.net",
    "amazon.com",
    "googleusercontent.com",
    "akamai.net",
    "tiktokv.com",
    "ntp.org",
    "googlesyndication.com",
    "live.com",
    "cloudfront.net",
    "tiktokrow-cdn.com",
    "cloudflare-dns.com",
    "cdn77.org",
    "gvt2.com",
    "akamaiedge.net",
    "cdninstagram.com",
    "aaplimg.com",
    "tiktokeu-cdn.com",
    "bytefcdn-oversea.com",
    "netflix.com",
    "bing.com",
    "tiktokcdn-eu.com",
    "ytimg.com",
    "spotify.com",
    "gvt1.com",
    "office.com",
    "yahoo.com",
    "gccdn.net",
    "bytefcdn-ttpeu.com",
    "googleadservices.com",
    "samsung.com",
    "dns.google",
    "snapchat.com",
    "google-analytics.com",
    "unity3d.com",
    "twitter.com",
    "fastly.net",
    "amazon-adsystem.com",
    "one.one",
    "app-measurement.com",
    "ttlivecdn.com",
    "app-analytics-services.com",
    "applovin.com",
    "msftncsi.com",
    "criteo.com",
    "googletagmanager.com",
    "azure.com",
    "trafficmanager.net",
    "rocket-cdn.com",
    "ui.com",
    "steamserver.net",
    "roblox.com",
    "msn.com",
    "ggpht.com",
    "wikipedia.org",
    "appsflyersdk.com",
    "baidu.com",
    "linkedin.com",
    "skype.com",
    "rubiconproject.com",
    "windows.net",
    "sentry.io",
    "a2z.com",
    "microsoftonline.com",
    "whatsapp.com",
    "office.net",
    "digicert.com",
    "tiktokcdn-us.com",
    "rbxcdn.com",
    "xiaomi.com",
    "adnxs.com",
    "windows.com",
    "taboola.com",
    "doubleverify.com",
    "3gppnetwork.org",
    "android.com",
    "gmail.com",
    "casalemedia.com",
    "qq.com",
    "sharepoint.com",
    "cdn-apple.com",
    "qlivecdn.com",
    "pangle.io",
];

/// The default hostname list as owned strings.
#[must_use]
pub fn default_hostnames() -> Vec<String> {
    DEFAULT_HOSTNAMES.iter().map(|s| (*s).to_string()).collect()
}

/// Use `overrides` if any were given, the default list otherwise.
#[must_use]
pub fn hostnames_or_default(overrides: Vec<String>) -> Vec<String> {
    let overrides: Vec<String> = overrides
        .into_iter()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect();

    if overrides.is_empty() {
        default_hostnames()
    } else {
        overrides
    }
}
