use super::locale::Language;

/// A time zone with a constant UTC offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    name: String,
    offset_minutes: i32,
    info: Option<&'static ZoneInfo>,
}

#[derive(Debug, PartialEq, Eq)]
struct ZoneInfo {
    name: &'static str,
    offset_minutes: i32,
    short_en: Option<&'static str>,
    long_en: &'static str,
    long_ko: Option<&'static str>,
}

const fn info(
    name: &'static str,
    offset_minutes: i32,
    short_en: Option<&'static str>,
    long_en: &'static str,
    long_ko: Option<&'static str>,
) -> ZoneInfo {
    ZoneInfo {
        name,
        offset_minutes,
        short_en,
        long_en,
        long_ko,
    }
}

// Zones without daylight saving time, so a fixed offset is exact.
static ZONES: &[ZoneInfo] = &[
    info("UTC", 0, Some("UTC"), "Coordinated Universal Time", Some("협정 세계시")),
    info("Asia/Seoul", 540, None, "Korean Standard Time", Some("대한민국 표준시")),
    info("Asia/Tokyo", 540, None, "Japan Standard Time", Some("일본 표준시")),
    info("Asia/Shanghai", 480, None, "China Standard Time", Some("중국 표준시")),
    info("Asia/Hong_Kong", 480, None, "Hong Kong Standard Time", None),
    info("Asia/Taipei", 480, None, "Taipei Standard Time", None),
    info("Asia/Singapore", 480, None, "Singapore Standard Time", None),
    info("Asia/Manila", 480, None, "Philippine Standard Time", None),
    info("Asia/Bangkok", 420, None, "Indochina Time", None),
    info("Asia/Jakarta", 420, None, "Western Indonesia Time", None),
    info("Asia/Kolkata", 330, None, "India Standard Time", Some("인도 표준시")),
    info("Asia/Dubai", 240, None, "Gulf Standard Time", None),
    info("Europe/Moscow", 180, None, "Moscow Standard Time", None),
    info("Africa/Nairobi", 180, None, "East Africa Time", None),
    info("Africa/Lagos", 60, None, "West Africa Standard Time", None),
    info("America/Bogota", -300, None, "Colombia Standard Time", None),
    info("America/Lima", -300, None, "Peru Standard Time", None),
    info("America/Sao_Paulo", -180, None, "Brasilia Standard Time", None),
    info(
        "America/Argentina/Buenos_Aires",
        -180,
        None,
        "Argentina Standard Time",
        None,
    ),
    info("America/Phoenix", -420, Some("MST"), "Mountain Standard Time", None),
    info(
        "Pacific/Honolulu",
        -600,
        Some("HST"),
        "Hawaii-Aleutian Standard Time",
        None,
    ),
];

const UTC_ALIASES: &[&str] = &[
    "utc",
    "gmt",
    "uct",
    "zulu",
    "universal",
    "greenwich",
    "gmt0",
    "etc/utc",
    "etc/gmt",
    "etc/uct",
    "etc/zulu",
    "etc/universal",
    "etc/greenwich",
    "etc/gmt0",
];

const LINKS: &[(&str, &str)] = &[
    ("asia/calcutta", "Asia/Kolkata"),
    ("asia/saigon", "Asia/Bangkok"),
    ("rok", "Asia/Seoul"),
    ("japan", "Asia/Tokyo"),
    ("prc", "Asia/Shanghai"),
    ("us/arizona", "America/Phoenix"),
    ("us/hawaii", "Pacific/Honolulu"),
    ("america/buenos_aires", "America/Argentina/Buenos_Aires"),
];

impl Zone {
    #[must_use]
    pub fn utc() -> Self {
        Self::from_info(&ZONES[0])
    }

    fn from_info(info: &'static ZoneInfo) -> Self {
        Self {
            name: info.name.to_owned(),
            offset_minutes: info.offset_minutes,
            info: Some(info),
        }
    }

    /// Look up a zone by IANA name (case-insensitive), UTC alias, or
    /// `±HH`, `±HHMM`, `±HH:MM` offset.
    #[must_use]
    pub fn resolve(name: &str) -> Option<Self> {
        if let Some(offset_minutes) = parse_offset(name) {
            let sign = if offset_minutes < 0 { '-' } else { '+' };
            let abs = offset_minutes.abs();
            return Some(Self {
                name: format!("{sign}{:02}:{:02}", abs / 60, abs % 60),
                offset_minutes,
                info: None,
            });
        }
        let lower = name.to_ascii_lowercase();
        if UTC_ALIASES.contains(&lower.as_str()) {
            return Some(Self::utc());
        }
        let target = LINKS
            .iter()
            .find(|(link, _)| *link == lower)
            .map_or(lower.as_str(), |&(_, target)| target);
        ZONES
            .iter()
            .find(|zone| zone.name.eq_ignore_ascii_case(target))
            .map(Self::from_info)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn offset_minutes(&self) -> i32 {
        self.offset_minutes
    }

    /// Display name for the `timeZoneName` option.
    #[must_use]
    pub fn display_name(&self, language: Language, style: &str) -> String {
        let long = style == "long";
        match (self.info, language, long) {
            (Some(info), Language::English, true) => info.long_en.to_owned(),
            (Some(ZoneInfo { long_ko: Some(name), .. }), Language::Korean, true) => {
                (*name).to_owned()
            }
            (Some(ZoneInfo { short_en: Some(abbr), .. }), Language::English, false) => {
                (*abbr).to_owned()
            }
            (Some(ZoneInfo { offset_minutes: 0, .. }), _, false) => "UTC".to_owned(),
            (_, _, true) => long_offset(self.offset_minutes),
            (_, _, false) => short_offset(self.offset_minutes),
        }
    }
}

fn parse_offset(text: &str) -> Option<i32> {
    let sign = match text.as_bytes().first().copied()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let rest = &text[1..];
    if !rest.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return None;
    }
    let (hours, minutes) = match rest.len() {
        2 => (rest, "0"),
        4 if !rest.contains(':') => (&rest[..2], &rest[2..]),
        5 if rest.as_bytes()[2] == b':' => (&rest[..2], &rest[3..]),
        _ => return None,
    };
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 60 + minutes))
}

fn short_offset(offset_minutes: i32) -> String {
    if offset_minutes == 0 {
        return "GMT".to_owned();
    }
    let sign = if offset_minutes < 0 { '-' } else { '+' };
    let abs = offset_minutes.abs();
    if abs % 60 == 0 {
        format!("GMT{sign}{}", abs / 60)
    } else {
        format!("GMT{sign}{}:{:02}", abs / 60, abs % 60)
    }
}

fn long_offset(offset_minutes: i32) -> String {
    if offset_minutes == 0 {
        return "GMT".to_owned();
    }
    let sign = if offset_minutes < 0 { '-' } else { '+' };
    let abs = offset_minutes.abs();
    format!("GMT{sign}{:02}:{:02}", abs / 60, abs % 60)
}
