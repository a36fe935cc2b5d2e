// ==========================================
// 名册导入引擎 - 领域类型定义
// ==========================================
// 职责: 规范字段集合（固定配置，不由输入推导）
// 必填: cedula / primerNombre / primerApellido
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 规范字段 (Canonical Field)
// ==========================================
// 序列化格式: camelCase（与导出表头一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalField {
    Cedula,
    PrimerNombre,
    SegundoNombre,
    PrimerApellido,
    SegundoApellido,
    Genero,
    Promocion,
    Status,
    Sede,
    Condicion,
    FechaEgreso,
    Carrera,
}

impl CanonicalField {
    /// 必填字段（声明顺序）
    pub const REQUIRED: [CanonicalField; 3] = [
        CanonicalField::Cedula,
        CanonicalField::PrimerNombre,
        CanonicalField::PrimerApellido,
    ];

    /// 可选字段（声明顺序）
    pub const OPTIONAL: [CanonicalField; 9] = [
        CanonicalField::SegundoNombre,
        CanonicalField::SegundoApellido,
        CanonicalField::Genero,
        CanonicalField::Promocion,
        CanonicalField::Status,
        CanonicalField::Sede,
        CanonicalField::Condicion,
        CanonicalField::FechaEgreso,
        CanonicalField::Carrera,
    ];

    /// 枚举顺序：必填在前，可选在后
    pub const ALL: [CanonicalField; 12] = [
        CanonicalField::Cedula,
        CanonicalField::PrimerNombre,
        CanonicalField::PrimerApellido,
        CanonicalField::SegundoNombre,
        CanonicalField::SegundoApellido,
        CanonicalField::Genero,
        CanonicalField::Promocion,
        CanonicalField::Status,
        CanonicalField::Sede,
        CanonicalField::Condicion,
        CanonicalField::FechaEgreso,
        CanonicalField::Carrera,
    ];

    /// 字段名（导出表头使用的名称）
    pub fn name(&self) -> &'static str {
        match self {
            CanonicalField::Cedula => "cedula",
            CanonicalField::PrimerNombre => "primerNombre",
            CanonicalField::SegundoNombre => "segundoNombre",
            CanonicalField::PrimerApellido => "primerApellido",
            CanonicalField::SegundoApellido => "segundoApellido",
            CanonicalField::Genero => "genero",
            CanonicalField::Promocion => "promocion",
            CanonicalField::Status => "status",
            CanonicalField::Sede => "sede",
            CanonicalField::Condicion => "condicion",
            CanonicalField::FechaEgreso => "fechaEgreso",
            CanonicalField::Carrera => "carrera",
        }
    }

    /// 是否必填
    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CanonicalField {
    type Err = String;

    /// 按字段名解析（大小写不敏感）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.name().to_lowercase() == wanted)
            .ok_or_else(|| format!("未知字段: {}", s))
    }
}
