//! 数据面板的聚合统计
//!
//! 对当前内存中的完整列表做三个计数，每次渲染重新计算。
//! 在这个数据规模下可以接受，未针对增长做设计。

use crate::WaterBody;
use crate::level::{Level, normalize};

/// 客户端计算的三项统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    /// 记录总数
    pub total: usize,
    /// 生物多样性为 "alta" 的记录数（大小写不敏感）
    pub biodiversidad_alta: usize,
    /// 污染等级不低于 "medio" 的记录数（按固定排名表）
    pub contaminacion_media_alta: usize,
}

impl DashboardStats {
    pub fn compute(cuerpos: &[WaterBody]) -> Self {
        let umbral = Level::Medio.rank();
        Self {
            total: cuerpos.len(),
            biodiversidad_alta: cuerpos
                .iter()
                .filter(|c| normalize(&c.biodiversidad) == "alta")
                .count(),
            contaminacion_media_alta: cuerpos
                .iter()
                .filter(|c| Level::rank_of(&c.contaminacion) >= umbral)
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cuerpo(contaminacion: &str, biodiversidad: &str) -> WaterBody {
        WaterBody {
            id: 0,
            nombre: "X".into(),
            tipo: "Río".into(),
            latitud: 0.0,
            longitud: 0.0,
            contaminacion: contaminacion.to_string(),
            biodiversidad: biodiversidad.to_string(),
            descripcion: None,
            temperatura: None,
            ph: None,
            oxigeno_disuelto: None,
            fecha_actualizacion: None,
        }
    }

    #[test]
    fn empty_list_yields_zero() {
        assert_eq!(DashboardStats::compute(&[]), DashboardStats::default());
    }

    #[test]
    fn total_equals_length() {
        let lista = vec![cuerpo("Baja", "Baja"), cuerpo("Alta", "Alta")];
        assert_eq!(DashboardStats::compute(&lista).total, 2);
    }

    #[test]
    fn high_biodiversity_is_exact_case_insensitive_match() {
        let lista = vec![
            cuerpo("Baja", "Alta"),
            cuerpo("Baja", "ALTA"),
            cuerpo("Baja", "Media"),
            // "alto" 是污染词汇，不算生物多样性 "alta"
            cuerpo("Baja", "Alto"),
        ];
        assert_eq!(DashboardStats::compute(&lista).biodiversidad_alta, 2);
    }

    #[test]
    fn pollution_threshold_is_medio_and_above() {
        let lista = vec![
            cuerpo("Baja", "Media"),        // 1: 不计
            cuerpo("Medio-Bajo", "Media"),  // 2: 不计
            cuerpo("Medio", "Media"),       // 3: 计
            cuerpo("Media", "Media"),       // 3: 计
            cuerpo("Medio-Alto", "Media"),  // 4: 计
            cuerpo("Alta", "Media"),        // 5: 计
            cuerpo("desconocido", "Media"), // 0: 不计
        ];
        assert_eq!(DashboardStats::compute(&lista).contaminacion_media_alta, 4);
    }
}
