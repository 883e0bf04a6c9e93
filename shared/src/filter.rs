//! 水体类型过滤
//!
//! 过滤完全在客户端、对已取回的完整列表进行，无分页。
//! 匹配对大小写与重音不敏感，且容忍子串（"Río Magdalena" 算作河流）。
//!
//! 策略：无法识别的过滤键按"全部"处理（fail-open），
//! 宁可多显示也不把界面过滤成空白。

use crate::WaterBody;
use crate::level::normalize;

/// 水体分类（仅用于客户端的过滤与着色）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterBodyKind {
    Rio,
    Lago,
    Oceano,
    Desconocido,
}

impl WaterBodyKind {
    /// 按线上 `tipo` 标签分类，子串匹配
    pub fn classify(tipo: &str) -> Self {
        let t = normalize(tipo);
        if t.contains("rio") {
            WaterBodyKind::Rio
        } else if t.contains("lago") {
            WaterBodyKind::Lago
        } else if t.contains("oceano") {
            WaterBodyKind::Oceano
        } else {
            WaterBodyKind::Desconocido
        }
    }
}

/// 列表过滤键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaterBodyFilter {
    #[default]
    Todos,
    Rios,
    Lagos,
    Oceanos,
}

impl WaterBodyFilter {
    pub const ALL: [WaterBodyFilter; 4] = [
        WaterBodyFilter::Todos,
        WaterBodyFilter::Rios,
        WaterBodyFilter::Lagos,
        WaterBodyFilter::Oceanos,
    ];

    /// 解析界面过滤键；无法识别时 fail-open 为 `Todos`
    pub fn from_key(key: &str) -> Self {
        match normalize(key).as_str() {
            "todos" => WaterBodyFilter::Todos,
            "rio" | "rios" => WaterBodyFilter::Rios,
            "lago" | "lagos" => WaterBodyFilter::Lagos,
            "oceano" | "oceanos" => WaterBodyFilter::Oceanos,
            _ => WaterBodyFilter::Todos,
        }
    }

    /// 按钮文案
    pub fn label(&self) -> &'static str {
        match self {
            WaterBodyFilter::Todos => "Todos",
            WaterBodyFilter::Rios => "Ríos",
            WaterBodyFilter::Lagos => "Lagos",
            WaterBodyFilter::Oceanos => "Océanos",
        }
    }

    pub fn matches(&self, cuerpo: &WaterBody) -> bool {
        match self {
            WaterBodyFilter::Todos => true,
            WaterBodyFilter::Rios => WaterBodyKind::classify(&cuerpo.tipo) == WaterBodyKind::Rio,
            WaterBodyFilter::Lagos => WaterBodyKind::classify(&cuerpo.tipo) == WaterBodyKind::Lago,
            WaterBodyFilter::Oceanos => {
                WaterBodyKind::classify(&cuerpo.tipo) == WaterBodyKind::Oceano
            }
        }
    }
}

/// 返回匹配过滤键的子集（`Todos` 时为完整列表）
pub fn filter_water_bodies(cuerpos: &[WaterBody], filtro: WaterBodyFilter) -> Vec<WaterBody> {
    cuerpos
        .iter()
        .filter(|c| filtro.matches(c))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cuerpo(id: i64, tipo: &str) -> WaterBody {
        WaterBody {
            id,
            nombre: format!("Cuerpo {id}"),
            tipo: tipo.to_string(),
            latitud: 0.0,
            longitud: 0.0,
            contaminacion: "Baja".into(),
            biodiversidad: "Alta".into(),
            descripcion: None,
            temperatura: None,
            ph: None,
            oxigeno_disuelto: None,
            fecha_actualizacion: None,
        }
    }

    fn sample() -> Vec<WaterBody> {
        vec![
            cuerpo(1, "Río"),
            cuerpo(2, "rio"),
            cuerpo(3, "Lago"),
            cuerpo(4, "Océano"),
            cuerpo(5, "Humedal"),
        ]
    }

    #[test]
    fn todos_returns_full_list() {
        let lista = sample();
        let res = filter_water_bodies(&lista, WaterBodyFilter::Todos);
        assert_eq!(res.len(), lista.len());
    }

    #[test]
    fn filter_is_accent_and_case_tolerant() {
        let lista = sample();
        let rios = filter_water_bodies(&lista, WaterBodyFilter::Rios);
        assert_eq!(rios.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2]);
        let oceanos = filter_water_bodies(&lista, WaterBodyFilter::Oceanos);
        assert_eq!(oceanos.iter().map(|c| c.id).collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn filter_matches_substrings() {
        let lista = vec![cuerpo(9, "Río Magdalena")];
        let rios = filter_water_bodies(&lista, WaterBodyFilter::Rios);
        assert_eq!(rios.len(), 1);
    }

    #[test]
    fn result_is_subset_of_input() {
        let lista = sample();
        for filtro in WaterBodyFilter::ALL {
            let res = filter_water_bodies(&lista, filtro);
            assert!(res.len() <= lista.len());
            for c in &res {
                assert!(lista.iter().any(|orig| orig.id == c.id));
                assert!(filtro.matches(c));
            }
        }
    }

    #[test]
    fn unknown_key_fails_open() {
        assert_eq!(WaterBodyFilter::from_key("pantano"), WaterBodyFilter::Todos);
        assert_eq!(WaterBodyFilter::from_key(""), WaterBodyFilter::Todos);
        assert_eq!(WaterBodyFilter::from_key("Ríos"), WaterBodyFilter::Rios);
        assert_eq!(WaterBodyFilter::from_key("océano"), WaterBodyFilter::Oceanos);
    }

    #[test]
    fn unrecognized_type_only_visible_under_todos() {
        let lista = sample();
        for filtro in [
            WaterBodyFilter::Rios,
            WaterBodyFilter::Lagos,
            WaterBodyFilter::Oceanos,
        ] {
            assert!(filter_water_bodies(&lista, filtro).iter().all(|c| c.id != 5));
        }
        assert!(
            filter_water_bodies(&lista, WaterBodyFilter::Todos)
                .iter()
                .any(|c| c.id == 5)
        );
    }
}
