// ==========================================
// 名册导入引擎 - 字段映射 (FieldMapping)
// ==========================================
// 职责: 规范字段 → 源表头 的部分映射
// 顺序: 按字段首次写入的顺序（决定导出列顺序）
// ==========================================

use crate::domain::types::CanonicalField;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// 单个映射条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub field: CanonicalField,

    /// 源表头；None 表示显式"不映射"（键仍保留在映射中）
    pub source: Option<String>,
}

/// 字段映射
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    entries: Vec<MappingEntry>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入字段映射
    ///
    /// 已存在的字段原位更新；新字段追加到末尾。
    /// 空白表头视为"不映射"。
    pub fn set(&mut self, field: CanonicalField, source: Option<String>) {
        let source = source.filter(|s| !s.is_empty());

        match self.entries.iter_mut().find(|e| e.field == field) {
            Some(entry) => entry.source = source,
            None => self.entries.push(MappingEntry { field, source }),
        }
    }

    /// 字段当前映射的源表头
    pub fn source(&self, field: CanonicalField) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .and_then(|e| e.source.as_deref())
    }

    /// 字段是否为映射的键（无论是否已映射到表头）
    pub fn contains_field(&self, field: CanonicalField) -> bool {
        self.entries.iter().any(|e| e.field == field)
    }

    /// 所有条目（声明顺序）
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// 映射的全部键（声明顺序）
    pub fn fields(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        self.entries.iter().map(|e| e.field)
    }

    /// 活动字段：源表头非空的字段（声明顺序）
    pub fn active_fields(&self) -> Vec<CanonicalField> {
        self.entries
            .iter()
            .filter(|e| e.source.as_deref().is_some_and(|s| !s.is_empty()))
            .map(|e| e.field)
            .collect()
    }

    /// 至少有一个字段映射到非空白表头
    pub fn is_valid(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.source.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(CanonicalField, String)> for FieldMapping {
    fn from_iter<I: IntoIterator<Item = (CanonicalField, String)>>(iter: I) -> Self {
        let mut mapping = FieldMapping::new();
        for (field, source) in iter {
            mapping.set(field, Some(source));
        }
        mapping
    }
}

// 序列化为 {字段名: 表头}，未映射输出空串
impl Serialize for FieldMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(entry.field.name(), entry.source.as_deref().unwrap_or(""))?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_unset_is_invalid() {
        let mut mapping = FieldMapping::new();
        assert!(!mapping.is_valid());

        mapping.set(CanonicalField::Cedula, None);
        mapping.set(CanonicalField::Sede, Some(String::new()));
        assert!(!mapping.is_valid());
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn test_single_field_is_valid() {
        let mut mapping = FieldMapping::new();
        mapping.set(CanonicalField::Genero, Some("sexo".to_string()));
        assert!(mapping.is_valid());
    }

    #[test]
    fn test_whitespace_source_is_not_valid() {
        let mut mapping = FieldMapping::new();
        mapping.set(CanonicalField::Cedula, Some("   ".to_string()));
        assert!(!mapping.is_valid());
    }

    #[test]
    fn test_update_keeps_position() {
        let mut mapping = FieldMapping::new();
        mapping.set(CanonicalField::Cedula, Some("ci".to_string()));
        mapping.set(CanonicalField::Sede, Some("campus".to_string()));
        mapping.set(CanonicalField::Cedula, Some("documento".to_string()));

        let fields: Vec<_> = mapping.fields().collect();
        assert_eq!(fields, vec![CanonicalField::Cedula, CanonicalField::Sede]);
        assert_eq!(mapping.source(CanonicalField::Cedula), Some("documento"));
    }

    #[test]
    fn test_active_fields_skip_unmapped() {
        let mut mapping = FieldMapping::new();
        mapping.set(CanonicalField::Cedula, Some("ci".to_string()));
        mapping.set(CanonicalField::PrimerNombre, None);
        mapping.set(CanonicalField::Carrera, Some("programa".to_string()));

        assert_eq!(
            mapping.active_fields(),
            vec![CanonicalField::Cedula, CanonicalField::Carrera]
        );
        assert!(mapping.contains_field(CanonicalField::PrimerNombre));
        assert_eq!(mapping.source(CanonicalField::PrimerNombre), None);
    }

    #[test]
    fn test_serialize_as_ordered_object() {
        let mut mapping = FieldMapping::new();
        mapping.set(CanonicalField::PrimerNombre, Some("Nombre".to_string()));
        mapping.set(CanonicalField::Cedula, None);

        let json = serde_json::to_string(&mapping).unwrap();
        assert_eq!(json, r#"{"primerNombre":"Nombre","cedula":""}"#);
    }
}
