// 2^53. Past it an f64 can't hold every integer, so such values stay text.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// A CSV value, typed by its content.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn from_field(field: &str) -> Self {
        match field {
            "" => Cell::Null,
            "true" | "TRUE" => Cell::Bool(true),
            "false" | "FALSE" => Cell::Bool(false),
            _ if looks_numeric(field) => match field.trim().parse::<f64>() {
                Ok(n) if n.abs() < MAX_EXACT_INT => Cell::Number(n),
                _ => Cell::Text(field.to_string()),
            },
            _ => Cell::Text(field.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => write!(f, "{s}"),
        }
    }
}

// Plain decimal or scientific notation only. `f64::from_str` would also take
// "inf" and "NaN", which the flow data sets carry as text.
fn looks_numeric(field: &str) -> bool {
    let s = field.trim();
    let s = s.strip_prefix('-').unwrap_or(s);
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };
    let mut dots = 0;
    let mut digits = 0;
    for c in mantissa.chars() {
        match c {
            '.' => dots += 1,
            '0'..='9' => digits += 1,
            _ => return false,
        }
    }
    if dots > 1 || digits == 0 {
        return false;
    }
    match exponent {
        None => true,
        Some(e) => {
            let e = e.strip_prefix(['+', '-']).unwrap_or(e);
            !e.is_empty() && e.chars().all(|c| c.is_ascii_digit())
        }
    }
}
