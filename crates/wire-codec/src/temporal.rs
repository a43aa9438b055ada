//! Codecs de fecha, hora, fecha-hora y duración.
//!
//! Las gramáticas del wire son las variantes ISO-8601 de fecha/hora y una
//! forma textual de duración al estilo XSD: `[-]P[nD][T[nH][nM][n[.f]S]]`.
//! Las entradas se reconocen por expresión regular, igual que el resto de
//! gramáticas de este crate, y los fallos conservan el valor ofensivo.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use wire_model::CodecError;

use crate::attrs::{DateAttrs, DateTimeAttrs, TimeAttrs};
use crate::text::apply_wrapper;

static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<hr>\d{2}):(?P<min>\d{2}):(?P<sec>\d{2})(?P<sec_frac>\.\d+)?$").expect("gramática de hora")
});

const DATETIME_CORE: &str = r"^(?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2})[T ](?P<hr>\d{2}):(?P<min>\d{2}):(?P<sec>\d{2})(?P<sec_frac>\.\d+)?";

static DATETIME_UTC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("{DATETIME_CORE}Z$")).expect("gramática UTC"));

static DATETIME_OFFSET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("{DATETIME_CORE}(?P<tz_sign>[+-])(?P<tz_hr>\\d{{2}}):(?P<tz_min>\\d{{2}})$"))
        .expect("gramática con desplazamiento")
});

static DATETIME_LOCAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("{DATETIME_CORE}$")).expect("gramática local"));

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<sign>-?)P(?:(?P<years>\d+)Y)?(?:(?P<months>\d+)M)?(?:(?P<days>\d+)D)?(?:T(?:(?P<hours>\d+)H)?(?:(?P<minutes>\d+)M)?(?:(?P<seconds>\d+(?:\.\d+)?)S)?)?$")
        .expect("gramática de duración")
});

/// Fecha-hora nativa: zonada (desplazamiento fijo) o ingenua, según el
/// sufijo que traía el wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateTimeValue {
    Naive(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
}

fn capture_u32(caps: &Captures<'_>, name: &str) -> u32 {
    // los grupos son \d+, el parse no puede fallar
    caps.name(name).and_then(|m| m.as_str().parse().ok()).unwrap_or(0)
}

fn capture_i64(caps: &Captures<'_>, name: &str) -> i64 {
    caps.name(name).and_then(|m| m.as_str().parse().ok()).unwrap_or(0)
}

/// Fracción de segundo a microsegundos enteros, redondeando más allá del
/// sexto dígito. El redondeo puede acarrear un segundo completo, que se
/// devuelve aparte para no fabricar un segundo intercalar.
fn frac_to_micros(frac: Option<&str>) -> (i64, u32) {
    let micros = match frac {
        None => 0u32,
        Some(f) => {
            let v: f64 = f.parse().unwrap_or(0.0);
            (v * 1e6).round() as u32
        }
    };
    if micros >= 1_000_000 {
        (1, micros - 1_000_000)
    } else {
        (0, micros)
    }
}

pub fn time_to_string(_attrs: &TimeAttrs, value: NaiveTime) -> String {
    value.format("%H:%M:%S%.f").to_string()
}

pub fn time_from_string(_attrs: &TimeAttrs, s: &str) -> Result<NaiveTime, CodecError> {
    let caps = TIME_RE.captures(s)
                      .ok_or_else(|| CodecError::validation(s, "no coincide con la gramática ISO de hora"))?;
    let (carry, micros) = frac_to_micros(caps.name("sec_frac").map(|m| m.as_str()));
    let time = NaiveTime::from_hms_micro_opt(capture_u32(&caps, "hr"),
                                             capture_u32(&caps, "min"),
                                             capture_u32(&caps, "sec"),
                                             micros)
        .ok_or_else(|| CodecError::validation(s, "hora fuera de rango"))?;
    Ok(time + Duration::seconds(carry))
}

fn naive_from_caps(caps: &Captures<'_>, original: &str) -> Result<NaiveDateTime, CodecError> {
    let date = NaiveDate::from_ymd_opt(capture_i64(caps, "year") as i32,
                                       capture_u32(caps, "month"),
                                       capture_u32(caps, "day"))
        .ok_or_else(|| CodecError::validation(original, "fecha fuera de rango"))?;
    let (carry, micros) = frac_to_micros(caps.name("sec_frac").map(|m| m.as_str()));
    let naive = date.and_hms_micro_opt(capture_u32(caps, "hr"),
                                       capture_u32(caps, "min"),
                                       capture_u32(caps, "sec"),
                                       micros)
                    .ok_or_else(|| CodecError::validation(original, "hora fuera de rango"))?;
    Ok(naive + Duration::seconds(carry))
}

fn attach_offset(naive: NaiveDateTime, offset: FixedOffset, original: &str) -> Result<DateTime<FixedOffset>, CodecError> {
    naive.and_local_timezone(offset)
         .single()
         .ok_or_else(|| CodecError::validation(original, "fecha-hora ambigua en la zona indicada"))
}

pub fn datetime_to_string(attrs: &DateTimeAttrs, value: DateTimeValue) -> String {
    let mut value = value;
    if let (Some(tz), DateTimeValue::Zoned(dt)) = (attrs.as_timezone, value) {
        value = DateTimeValue::Zoned(dt.with_timezone(&tz));
    }
    if !attrs.timezone {
        if let DateTimeValue::Zoned(dt) = value {
            value = DateTimeValue::Naive(dt.naive_local());
        }
    }

    let rendered = match (&attrs.format, value) {
        (Some(fmt), DateTimeValue::Naive(dt)) => dt.format(fmt).to_string(),
        (Some(fmt), DateTimeValue::Zoned(dt)) => dt.format(fmt).to_string(),
        (None, DateTimeValue::Naive(dt)) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
        (None, DateTimeValue::Zoned(dt)) => dt.format("%Y-%m-%dT%H:%M:%S%.f%:z").to_string(),
    };

    match &attrs.string_format {
        Some(template) => apply_wrapper(template, &rendered),
        None => rendered,
    }
}

/// Reconoce las tres gramáticas ISO por sufijo: `Z`, `±HH:MM` o ninguno.
pub fn datetime_from_string_iso(attrs: &DateTimeAttrs, s: &str) -> Result<DateTimeValue, CodecError> {
    if let Some(caps) = DATETIME_UTC_RE.captures(s) {
        let naive = naive_from_caps(&caps, s)?;
        let utc = FixedOffset::east_opt(0).ok_or_else(|| CodecError::validation(s, "desplazamiento inválido"))?;
        let zoned = attach_offset(naive, utc, s)?;
        return Ok(DateTimeValue::Zoned(match attrs.as_timezone {
                      Some(tz) => zoned.with_timezone(&tz),
                      None => zoned,
                  }));
    }

    if let Some(caps) = DATETIME_OFFSET_RE.captures(s) {
        let naive = naive_from_caps(&caps, s)?;
        let minutes = capture_i64(&caps, "tz_hr") * 60 + capture_i64(&caps, "tz_min");
        let signed = if &caps["tz_sign"] == "-" { -minutes } else { minutes };
        let offset = FixedOffset::east_opt((signed * 60) as i32)
            .ok_or_else(|| CodecError::validation(s, "desplazamiento fuera de rango"))?;
        let zoned = attach_offset(naive, offset, s)?;
        return Ok(DateTimeValue::Zoned(match attrs.as_timezone {
                      Some(tz) => zoned.with_timezone(&tz),
                      None => zoned,
                  }));
    }

    if let Some(caps) = DATETIME_LOCAL_RE.captures(s) {
        let naive = naive_from_caps(&caps, s)?;
        return Ok(match attrs.as_timezone {
            Some(tz) => DateTimeValue::Zoned(attach_offset(naive, tz, s)?),
            None => DateTimeValue::Naive(naive),
        });
    }

    Err(CodecError::validation(s, "no coincide con ninguna gramática ISO de fecha-hora"))
}

pub fn datetime_from_string(attrs: &DateTimeAttrs, s: &str) -> Result<DateTimeValue, CodecError> {
    match &attrs.format {
        None => datetime_from_string_iso(attrs, s),
        Some(fmt) => {
            let naive = NaiveDateTime::parse_from_str(s, fmt)
                .map_err(|e| CodecError::validation(s, e.to_string()))?;
            Ok(match attrs.as_timezone {
                Some(tz) => DateTimeValue::Zoned(attach_offset(naive, tz, s)?),
                None => DateTimeValue::Naive(naive),
            })
        }
    }
}

pub fn date_to_string(attrs: &DateAttrs, value: NaiveDate) -> String {
    value.format(&attrs.format).to_string()
}

/// Parsea con el formato declarado, con repesca por la gramática de
/// fecha-hora con desplazamiento para entradas que traen componente horario.
pub fn date_from_string(attrs: &DateAttrs, s: &str) -> Result<NaiveDate, CodecError> {
    match NaiveDate::parse_from_str(s, &attrs.format) {
        Ok(date) => Ok(date),
        Err(e) => {
            if let Some(caps) = DATETIME_OFFSET_RE.captures(s) {
                NaiveDate::from_ymd_opt(capture_i64(&caps, "year") as i32,
                                        capture_u32(&caps, "month"),
                                        capture_u32(&caps, "day"))
                    .ok_or_else(|| CodecError::validation(s, "fecha fuera de rango"))
            } else {
                Err(CodecError::validation(s, e.to_string()))
            }
        }
    }
}

/// Codifica un lapso con signo a la forma textual de duración.
///
/// El atajo de día completo se conserva tal cual: un múltiplo exacto y no
/// nulo de 86400 segundos sin resto de microsegundos termina sin segmento
/// de tiempo.
pub fn duration_to_string(value: Duration) -> String {
    let negative = value < Duration::zero();
    let abs = if negative { -value } else { value };
    let total_secs = abs.num_seconds();
    let micros = abs.subsec_nanos() / 1000;

    let mut out = String::from(if negative { "-P" } else { "P" });

    let days = total_secs / 86400;
    if days != 0 {
        out.push_str(&format!("{days}D"));
    }

    if total_secs != 0 && total_secs % 86400 == 0 && micros == 0 {
        return out;
    }

    out.push('T');

    let hours = (total_secs % 86400) / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        out.push_str(&format!("{hours}H"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}M"));
    }
    if seconds > 0 || micros > 0 {
        out.push_str(&format!("{seconds}"));
        if micros > 0 {
            out.push_str(&format!(".{micros}"));
        }
        out.push('S');
    }

    // siempre hay al menos un componente tras la T
    if out.ends_with('T') {
        out.push_str("0S");
    }

    out
}

/// Decodifica la gramática de duración. Años y meses se aproximan a 365 y
/// 30 días: es una aproximación sin calendario, documentadamente con
/// pérdida, y no tiene ida y vuelta exacta.
pub fn duration_from_string(s: &str) -> Result<Duration, CodecError> {
    let caps = DURATION_RE.captures(s)
                          .ok_or_else(|| CodecError::validation(s, "no coincide con la gramática de duración"))?;

    let days = capture_i64(&caps, "days") + capture_i64(&caps, "months") * 30 + capture_i64(&caps, "years") * 365;
    let seconds_f: f64 = caps.name("seconds").and_then(|m| m.as_str().parse().ok()).unwrap_or(0.0);
    let whole = seconds_f.trunc() as i64;
    let micros = ((seconds_f - seconds_f.trunc()) * 1e6) as i64;

    let mut delta = Duration::days(days)
        + Duration::hours(capture_i64(&caps, "hours"))
        + Duration::minutes(capture_i64(&caps, "minutes"))
        + Duration::seconds(whole)
        + Duration::microseconds(micros);

    if &caps["sign"] == "-" {
        delta = -delta;
    }

    Ok(delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_round_trip_with_fraction() {
        let attrs = TimeAttrs::default();
        let t = NaiveTime::from_hms_micro_opt(10, 30, 45, 500_000).expect("hora válida");
        let s = time_to_string(&attrs, t);
        assert_eq!(time_from_string(&attrs, &s).expect("round trip"), t);
    }

    #[test]
    fn time_without_fraction_defaults_to_zero() {
        let t = time_from_string(&TimeAttrs::default(), "23:59:01").expect("parsea");
        assert_eq!(t, NaiveTime::from_hms_opt(23, 59, 1).expect("hora válida"));
    }

    #[test]
    fn time_fraction_rounds_to_micros() {
        let t = time_from_string(&TimeAttrs::default(), "00:00:00.1234567").expect("parsea");
        assert_eq!(t, NaiveTime::from_hms_micro_opt(0, 0, 0, 123_457).expect("hora válida"));
    }

    #[test]
    fn garbage_time_is_validation() {
        assert!(matches!(time_from_string(&TimeAttrs::default(), "25h"),
                         Err(CodecError::Validation { .. })));
    }

    #[test]
    fn datetime_suffix_selects_grammar() {
        let attrs = DateTimeAttrs::default();

        match datetime_from_string(&attrs, "2024-05-06T07:08:09Z").expect("UTC") {
            DateTimeValue::Zoned(dt) => assert_eq!(dt.offset().local_minus_utc(), 0),
            other => panic!("se esperaba zonada, hubo {other:?}"),
        }

        match datetime_from_string(&attrs, "2024-05-06T07:08:09+02:00").expect("offset") {
            DateTimeValue::Zoned(dt) => assert_eq!(dt.offset().local_minus_utc(), 2 * 3600),
            other => panic!("se esperaba zonada, hubo {other:?}"),
        }

        match datetime_from_string(&attrs, "2024-05-06T07:08:09").expect("local") {
            DateTimeValue::Naive(dt) => {
                assert_eq!(dt,
                           NaiveDate::from_ymd_opt(2024, 5, 6).expect("fecha")
                                                              .and_hms_opt(7, 8, 9)
                                                              .expect("hora"));
            }
            other => panic!("se esperaba ingenua, hubo {other:?}"),
        }
    }

    #[test]
    fn datetime_negative_offset() {
        match datetime_from_string(&DateTimeAttrs::default(), "2024-05-06T07:08:09-03:30").expect("offset") {
            DateTimeValue::Zoned(dt) => assert_eq!(dt.offset().local_minus_utc(), -(3 * 3600 + 30 * 60)),
            other => panic!("se esperaba zonada, hubo {other:?}"),
        }
    }

    #[test]
    fn datetime_round_trip_default_format() {
        let attrs = DateTimeAttrs::default();
        for s in ["2024-05-06T07:08:09+02:00", "2024-05-06T07:08:09.250+02:00", "2024-05-06T07:08:09"] {
            let v = datetime_from_string(&attrs, s).expect("parsea");
            assert_eq!(datetime_to_string(&attrs, v), s, "entrada {s}");
        }
    }

    #[test]
    fn datetime_long_fraction_rounds() {
        let v = datetime_from_string(&DateTimeAttrs::default(), "2024-01-01T00:00:00.9999999Z").expect("parsea");
        match v {
            DateTimeValue::Zoned(dt) => {
                // 0.9999999 redondea a un segundo entero
                assert_eq!(dt.time(), NaiveTime::from_hms_opt(0, 0, 1).expect("hora"));
            }
            other => panic!("se esperaba zonada, hubo {other:?}"),
        }
    }

    #[test]
    fn datetime_as_timezone_converts() {
        let tz = FixedOffset::east_opt(3600).expect("offset");
        let attrs = DateTimeAttrs { as_timezone: Some(tz),
                                    ..Default::default() };
        let rendered = datetime_to_string(&attrs,
                                          datetime_from_string(&attrs, "2024-05-06T12:00:00Z").expect("parsea"));
        assert_eq!(rendered, "2024-05-06T13:00:00+01:00");
    }

    #[test]
    fn datetime_timezone_flag_drops_offset() {
        let attrs = DateTimeAttrs { timezone: false,
                                    ..Default::default() };
        let v = datetime_from_string(&attrs, "2024-05-06T12:00:00+05:00").expect("parsea");
        assert_eq!(datetime_to_string(&attrs, v), "2024-05-06T12:00:00");
    }

    #[test]
    fn datetime_custom_format_overrides_iso() {
        let attrs = DateTimeAttrs { format: Some("%d/%m/%Y %H:%M".to_string()),
                                    ..Default::default() };
        let v = datetime_from_string(&attrs, "06/05/2024 07:08").expect("parsea");
        assert_eq!(datetime_to_string(&attrs, v), "06/05/2024 07:08");
    }

    #[test]
    fn datetime_string_format_wraps() {
        let attrs = DateTimeAttrs { string_format: Some("[{}]".to_string()),
                                    ..Default::default() };
        let v = datetime_from_string(&attrs, "2024-05-06T07:08:09").expect("parsea");
        assert_eq!(datetime_to_string(&attrs, v), "[2024-05-06T07:08:09]");
    }

    #[test]
    fn date_round_trip_and_fallback() {
        let attrs = DateAttrs::default();
        let d = date_from_string(&attrs, "2024-05-06").expect("parsea");
        assert_eq!(date_to_string(&attrs, d), "2024-05-06");

        // entrada con componente horario: se toma sólo la fecha
        let d = date_from_string(&attrs, "2024-05-06T23:59:59+02:00").expect("repesca");
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 5, 6).expect("fecha"));

        assert!(matches!(date_from_string(&attrs, "06-05-2024"),
                         Err(CodecError::Validation { .. })));
    }

    #[test]
    fn duration_whole_day_short_circuit() {
        assert_eq!(duration_to_string(Duration::days(1)), "P1D");
        assert_eq!(duration_to_string(Duration::days(3)), "P3D");
        assert_eq!(duration_to_string(-Duration::days(2)), "-P2D");
    }

    #[test]
    fn duration_time_segments() {
        assert_eq!(duration_to_string(Duration::hours(1) + Duration::minutes(30)), "PT1H30M");
        assert_eq!(duration_to_string(Duration::zero()), "PT0S");
        assert_eq!(duration_to_string(Duration::seconds(45)), "PT45S");
        assert_eq!(duration_to_string(Duration::days(1) + Duration::hours(2)), "P1DT2H");
        assert_eq!(duration_to_string(-(Duration::hours(1) + Duration::seconds(1))), "-PT1H1S");
    }

    #[test]
    fn duration_decode_basics() {
        assert_eq!(duration_from_string("P1D").expect("parsea"), Duration::days(1));
        assert_eq!(duration_from_string("PT1H30M").expect("parsea"),
                   Duration::hours(1) + Duration::minutes(30));
        assert_eq!(duration_from_string("-PT10S").expect("parsea"), -Duration::seconds(10));
        assert_eq!(duration_from_string("PT0.5S").expect("parsea"), Duration::microseconds(500_000));
    }

    #[test]
    fn duration_year_month_approximation() {
        assert_eq!(duration_from_string("P1Y2M3D").expect("parsea"),
                   Duration::days(365 + 60 + 3));
    }

    #[test]
    fn duration_garbage_is_validation() {
        assert!(matches!(duration_from_string("tres días"),
                         Err(CodecError::Validation { .. })));
    }
}
