// ==========================================
// 名册导入引擎 - 规范记录 (CanonicalRecord)
// ==========================================
// 约束: 对映射键集合全覆盖；缺失源值为空串
// 派生数据，映射变化时整体重算，不原位修改
// ==========================================

use crate::domain::types::CanonicalField;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// 规范记录（字段顺序与映射声明顺序一致）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalRecord {
    values: Vec<(CanonicalField, String)>,
}

impl CanonicalRecord {
    /// 以给定字段集合初始化，所有值为空串
    pub fn with_fields<I: IntoIterator<Item = CanonicalField>>(fields: I) -> Self {
        let mut record = Self::default();
        for field in fields {
            record.insert(field, String::new());
        }
        record
    }

    pub(crate) fn insert(&mut self, field: CanonicalField, value: String) {
        match self.values.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = value,
            None => self.values.push((field, value)),
        }
    }

    /// 字段值；字段不在记录中时返回 None
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        self.values.iter().map(|(f, _)| *f)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> + '_ {
        self.values.iter().map(|(f, v)| (*f, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for CanonicalRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in &self.values {
            map.serialize_entry(field.name(), value)?;
        }
        map.end()
    }
}
