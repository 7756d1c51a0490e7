// src/dashboard/format.rs
//
// Display formatting for KPI and detail values. The dashboard shows Spanish
// labels but keeps the original workbook's digit grouping (comma thousands
// separator, point decimal).

/// Integer with thousands separators: 1234567 -> "1,234,567".
pub fn miles(n: i64) -> String {
    let negativo = n < 0;
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if negativo {
        format!("-{out}")
    } else {
        out
    }
}

/// One decimal with thousands separators: 1234.56 -> "1,234.6".
pub fn miles_un_decimal(x: f64) -> String {
    let s = format!("{x:.1}");
    let (entero, decimal) = s.split_once('.').unwrap_or((s.as_str(), "0"));
    let entero: i64 = entero.parse().unwrap_or(0);
    format!("{}.{decimal}", miles(entero))
}

/// Total investment in millions of COP: 200_000_000.0 -> "$200M".
pub fn inversion_millones(cop: f64) -> String {
    let millones = format!("{:.0}", cop / 1_000_000.0);
    let millones: i64 = millones.parse().unwrap_or(0);
    format!("${}M", miles(millones))
}

/// Project duration, one decimal, no grouping (durations are small).
pub fn duracion(meses: f64) -> String {
    format!("{meses:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miles_groups_digits() {
        assert_eq!(miles(0), "0");
        assert_eq!(miles(999), "999");
        assert_eq!(miles(1_000), "1,000");
        assert_eq!(miles(1_234_567), "1,234,567");
        assert_eq!(miles(-45_000), "-45,000");
    }

    #[test]
    fn miles_un_decimal_keeps_one_decimal() {
        assert_eq!(miles_un_decimal(0.0), "0.0");
        assert_eq!(miles_un_decimal(42.55), "42.5");
        assert_eq!(miles_un_decimal(1234.56), "1,234.6");
    }

    #[test]
    fn inversion_rounds_to_whole_millions() {
        assert_eq!(inversion_millones(0.0), "$0M");
        assert_eq!(inversion_millones(200_000_000.0), "$200M");
        assert_eq!(inversion_millones(1_234_000_000.0), "$1,234M");
    }

    #[test]
    fn duracion_one_decimal() {
        assert_eq!(duracion(12.0), "12.0");
        assert_eq!(duracion(8.25), "8.2");
    }
}
