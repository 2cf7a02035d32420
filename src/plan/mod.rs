//! plan — стратегии вселенной идентификаторов.
//!
//! Пул (`pool::Pool`) параметризуется планом: план знает, как построить
//! полное множество допустимых идентификаторов и как проверить чужую строку
//! на формат/принадлежность. Две реализации:
//! - Ipv4Plan: последний октет в диапазоне `A.B.C.D` (start=1) или `A.B.C.S-E`;
//! - PartPlan: именованная серия `<prefix><ordinal>`, ordinals `[0, count)`.
//!
//! Канонический порядок — числовой: каждому идентификатору план сопоставляет
//! ordinal (u64), и пул хранит множества с ключом-ordinal. Поэтому `.2`
//! выдаётся раньше `.10`, независимо от ширины октета в строке.

use std::net::Ipv4Addr;

use crate::errors::PoolError;

/// Стратегия вселенной: генерация кандидатов + правила валидации.
///
/// `ordinal()` — одновременно membership-правило и ключ канонического
/// порядка: Some(n) означает «идентификатор лежит в настроенном диапазоне
/// и занимает позицию n».
pub trait IdPlan {
    /// Короткое имя семейства пулов (для логов и status).
    fn kind(&self) -> &'static str;

    /// Полная вселенная в каноническом порядке: (ordinal, identifier).
    fn universe(&self) -> Vec<(u64, String)>;

    /// Синтаксическое правило формата (без проверки диапазона).
    fn is_well_formed(&self, id: &str) -> bool;

    /// Позиция идентификатора в диапазоне плана; None — вне диапазона.
    fn ordinal(&self, id: &str) -> Option<u64>;
}

// ---------------------- Ipv4Plan ----------------------

/// Диапазон по последнему октету внутри фиксированного префикса /24.
#[derive(Debug, Clone)]
pub struct Ipv4Plan {
    spec: String,
    base: [u8; 3],
    prefix: String, // "A.B.C." — кэш для генерации
    start: u8,
    end: u8,
}

impl Ipv4Plan {
    /// Разбор спецификации: `A.B.C.D` (start=1, end=D) или `A.B.C.S-E`.
    /// Требование: 1 <= S <= E <= 254.
    pub fn parse(spec: &str) -> Result<Self, PoolError> {
        let bad = |reason: &str| PoolError::InvalidRangeSpec {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };

        let (prefix, tail) = spec.rsplit_once('.').ok_or_else(|| bad("missing '.'"))?;

        let octets: Vec<u8> = prefix
            .split('.')
            .map(|p| p.parse::<u8>())
            .collect::<Result<_, _>>()
            .map_err(|_| bad("base prefix is not three octets"))?;
        let base: [u8; 3] = octets
            .try_into()
            .map_err(|_| bad("base prefix is not three octets"))?;

        // Хвост: либо "E", либо "S-E".
        let (start, end) = match tail.split_once('-') {
            Some((s, e)) => (
                s.parse::<u16>().map_err(|_| bad("bad range start"))?,
                e.parse::<u16>().map_err(|_| bad("bad range end"))?,
            ),
            None => (1u16, tail.parse::<u16>().map_err(|_| bad("bad range end"))?),
        };

        if start < 1 || end > 254 || start > end {
            return Err(bad("range must satisfy 1 <= start <= end <= 254"));
        }

        Ok(Self {
            spec: spec.to_string(),
            base,
            prefix: format!("{}.{}.{}.", base[0], base[1], base[2]),
            start: start as u8,
            end: end as u8,
        })
    }

    /// Исходная строка спецификации (для status/логов).
    pub fn spec(&self) -> &str {
        &self.spec
    }

    pub fn range(&self) -> (u8, u8) {
        (self.start, self.end)
    }
}

impl IdPlan for Ipv4Plan {
    fn kind(&self) -> &'static str {
        "ipv4"
    }

    fn universe(&self) -> Vec<(u64, String)> {
        (self.start..=self.end)
            .map(|i| (i as u64, format!("{}{}", self.prefix, i)))
            .collect()
    }

    fn is_well_formed(&self, id: &str) -> bool {
        // std-разбор dotted-quad: отвергает лишние октеты, ведущие нули, мусор.
        id.parse::<Ipv4Addr>().is_ok()
    }

    fn ordinal(&self, id: &str) -> Option<u64> {
        let ip: Ipv4Addr = id.parse().ok()?;
        let [a, b, c, d] = ip.octets();
        if [a, b, c] != self.base {
            return None;
        }
        if d < self.start || d > self.end {
            return None;
        }
        Some(d as u64)
    }
}

// ---------------------- PartPlan ----------------------

/// Именованная серия партиций: `<prefix>0 .. <prefix>{count-1}`.
#[derive(Debug, Clone)]
pub struct PartPlan {
    prefix: String,
    count: u32,
}

impl PartPlan {
    pub fn new(prefix: impl Into<String>, count: u32) -> Self {
        Self {
            prefix: prefix.into(),
            count,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Канонический ordinal: хвост после префикса — десятичное число без
    /// ведущих нулей ("part007" не эквивалентен "part7").
    fn parse_ordinal(&self, id: &str) -> Option<u64> {
        let rest = id.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() || (rest.len() > 1 && rest.starts_with('0')) {
            return None;
        }
        let n: u32 = rest.parse().ok()?;
        Some(n as u64)
    }
}

impl IdPlan for PartPlan {
    fn kind(&self) -> &'static str {
        "parts"
    }

    fn universe(&self) -> Vec<(u64, String)> {
        (0..self.count)
            .map(|i| (i as u64, format!("{}{}", self.prefix, i)))
            .collect()
    }

    fn is_well_formed(&self, id: &str) -> bool {
        match id.strip_prefix(self.prefix.as_str()) {
            Some(rest) => !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()),
            None => false,
        }
    }

    fn ordinal(&self, id: &str) -> Option<u64> {
        let n = self.parse_ordinal(id)?;
        if n >= self.count as u64 {
            return None;
        }
        Some(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_parse_upper_bound_only() {
        let p = Ipv4Plan::parse("10.0.0.3").unwrap();
        assert_eq!(p.range(), (1, 3));
        let ids: Vec<String> = p.universe().into_iter().map(|(_, s)| s).collect();
        assert_eq!(ids, vec!["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
    }

    #[test]
    fn ipv4_parse_explicit_range() {
        let p = Ipv4Plan::parse("192.168.7.10-12").unwrap();
        assert_eq!(p.range(), (10, 12));
        assert_eq!(p.ordinal("192.168.7.11"), Some(11));
        assert_eq!(p.ordinal("192.168.7.13"), None);
        assert_eq!(p.ordinal("192.168.8.11"), None, "wrong base prefix");
    }

    #[test]
    fn ipv4_parse_rejects_bad_specs() {
        for s in [
            "nodots",
            "10.0.0.0",      // end < 1
            "10.0.0.255",    // end > 254
            "10.0.0.5-3",    // start > end
            "10.0.0.0-10",   // start < 1
            "10.0.0.a",
            "10.0.0.1-b",
            "10.0.300.5",    // base octet overflow
            "10.0.1-5",      // two-part prefix
        ] {
            assert!(
                matches!(Ipv4Plan::parse(s), Err(PoolError::InvalidRangeSpec { .. })),
                "spec {:?} must be rejected",
                s
            );
        }
    }

    #[test]
    fn ipv4_format_vs_range() {
        let p = Ipv4Plan::parse("10.0.0.1-50").unwrap();
        assert!(!p.is_well_formed("not-an-ip"));
        assert!(!p.is_well_formed("10.0.0.099"), "leading zeros are not dotted-quad");
        assert!(p.is_well_formed("10.0.0.99"));
        assert_eq!(p.ordinal("10.0.0.99"), None, "well-formed but outside 1-50");
    }

    #[test]
    fn ipv4_numeric_order() {
        // Числовой порядок: .2 раньше .10 (лексикографический дал бы обратное).
        let p = Ipv4Plan::parse("10.0.0.2-10").unwrap();
        let first = p.universe().into_iter().next().unwrap();
        assert_eq!(first, (2, "10.0.0.2".to_string()));
        assert!(p.ordinal("10.0.0.2").unwrap() < p.ordinal("10.0.0.10").unwrap());
    }

    #[test]
    fn part_plan_names_and_ordinals() {
        let p = PartPlan::new("part", 100);
        assert_eq!(p.universe().len(), 100);
        assert_eq!(p.universe()[0].1, "part0");
        assert_eq!(p.ordinal("part42"), Some(42));
        assert_eq!(p.ordinal("part100"), None);
        assert_eq!(p.ordinal("part007"), None, "non-canonical spelling");
        assert_eq!(p.ordinal("blob7"), None);
        assert!(p.is_well_formed("part7"));
        assert!(!p.is_well_formed("part"));
        assert!(!p.is_well_formed("part7x"));
    }
}
