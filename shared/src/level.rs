//! 序数等级词汇表
//!
//! 污染与生物多样性等级来自一个固定的小词汇表，带有非正式的顺序：
//! baja < medio-baja < medio < medio-alta < alta。
//! 线上值的大小写、词尾阴阳性（"Alto"/"Alta"）不稳定，解析时统一规范化。

/// 规范化标签：小写并去掉西班牙语重音符号
pub(crate) fn normalize(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            _ => c,
        })
        .collect()
}

/// 序数等级，声明顺序即排序顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Baja,
    MedioBaja,
    Medio,
    MedioAlta,
    Alta,
}

impl Level {
    /// 解析线上标签。无法识别的标签返回 `None`。
    pub fn parse(label: &str) -> Option<Level> {
        match normalize(label).as_str() {
            "baja" | "bajo" => Some(Level::Baja),
            "medio-baja" | "medio-bajo" | "media-baja" => Some(Level::MedioBaja),
            "medio" | "media" => Some(Level::Medio),
            "medio-alta" | "medio-alto" | "media-alta" => Some(Level::MedioAlta),
            "alta" | "alto" => Some(Level::Alta),
            _ => None,
        }
    }

    /// 固定排名表：baja=1 … alta=5
    pub fn rank(self) -> u8 {
        self as u8 + 1
    }

    /// 标签的排名；无法识别时为 0，永远低于任何已知等级
    pub fn rank_of(label: &str) -> u8 {
        Level::parse(label).map_or(0, Level::rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_rank_table() {
        assert_eq!(Level::rank_of("Baja"), 1);
        assert_eq!(Level::rank_of("Medio-Bajo"), 2);
        assert_eq!(Level::rank_of("Medio"), 3);
        assert_eq!(Level::rank_of("Media"), 3);
        assert_eq!(Level::rank_of("Medio-Alto"), 4);
        assert_eq!(Level::rank_of("Alta"), 5);
        assert_eq!(Level::rank_of("Alto"), 5);
    }

    #[test]
    fn unknown_labels_rank_zero() {
        assert_eq!(Level::rank_of(""), 0);
        assert_eq!(Level::rank_of("crítico"), 0);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Level::parse("MEDIO-ALTO"), Some(Level::MedioAlta));
        assert_eq!(Level::parse(" alta "), Some(Level::Alta));
    }

    #[test]
    fn ordering_follows_declaration() {
        assert!(Level::Baja < Level::MedioBaja);
        assert!(Level::Medio < Level::MedioAlta);
        assert!(Level::MedioAlta < Level::Alta);
    }
}
