// ==========================================
// 名册导入引擎 - 映射编辑器
// ==========================================
// 职责: 持有当前映射，接受人工覆写，暴露有效性
// 约束: 只接受已知表头或显式"不映射"
//       修改一个字段不影响其他字段（不自动解除重复占用）
// ==========================================

use crate::domain::{CanonicalField, FieldMapping};
use crate::importer::error::{ImportError, ImportResult};
use tracing::debug;

/// 映射目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingTarget {
    /// 源表头
    Header(String),

    /// 不映射
    Unmapped,
}

impl MappingTarget {
    /// 空串视为"不映射"
    pub fn from_option(value: Option<String>) -> Self {
        match value {
            Some(header) if !header.is_empty() => MappingTarget::Header(header),
            _ => MappingTarget::Unmapped,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MappingEditor {
    headers: Vec<String>,
    mapping: FieldMapping,
}

impl MappingEditor {
    /// 以表头与初始映射创建编辑器
    pub fn new(headers: Vec<String>, initial: FieldMapping) -> Self {
        Self {
            headers,
            mapping: initial,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// 设置字段映射
    ///
    /// # 返回
    /// - Err(UnknownHeader): 表头不在当前表格中
    pub fn set_field(&mut self, field: CanonicalField, target: MappingTarget) -> ImportResult<()> {
        match target {
            MappingTarget::Header(header) => {
                if !self.headers.contains(&header) {
                    return Err(ImportError::UnknownHeader(header));
                }
                debug!(field = %field, header = %header, "映射已更新");
                self.mapping.set(field, Some(header));
            }
            MappingTarget::Unmapped => {
                debug!(field = %field, "映射已清除");
                self.mapping.set(field, None);
            }
        }
        Ok(())
    }

    /// 至少一个字段映射到非空白表头
    pub fn is_valid(&self) -> bool {
        self.mapping.is_valid()
    }

    /// 冻结映射（进入预览阶段）
    ///
    /// # 返回
    /// - Err(InvalidMapping): 没有任何字段被映射
    pub fn freeze(self) -> ImportResult<FieldMapping> {
        if !self.is_valid() {
            return Err(ImportError::InvalidMapping);
        }
        Ok(self.mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> MappingEditor {
        let headers = vec!["ci".to_string(), "nombre".to_string()];
        MappingEditor::new(headers, FieldMapping::new())
    }

    #[test]
    fn test_unknown_header_rejected() {
        let mut editor = editor();
        let result = editor.set_field(
            CanonicalField::Cedula,
            MappingTarget::Header("dni".to_string()),
        );

        assert!(matches!(result, Err(ImportError::UnknownHeader(_))));
        assert!(!editor.mapping().contains_field(CanonicalField::Cedula));
    }

    #[test]
    fn test_validity_transitions() {
        let mut editor = editor();
        assert!(!editor.is_valid());

        editor
            .set_field(CanonicalField::Cedula, MappingTarget::Header("ci".to_string()))
            .unwrap();
        assert!(editor.is_valid());

        editor
            .set_field(CanonicalField::Cedula, MappingTarget::Unmapped)
            .unwrap();
        assert!(!editor.is_valid());
        assert!(editor.mapping().contains_field(CanonicalField::Cedula));
    }

    #[test]
    fn test_reused_header_not_auto_unmapped() {
        let mut editor = editor();
        editor
            .set_field(CanonicalField::PrimerNombre, MappingTarget::Header("nombre".to_string()))
            .unwrap();
        editor
            .set_field(CanonicalField::SegundoNombre, MappingTarget::Header("nombre".to_string()))
            .unwrap();

        assert_eq!(editor.mapping().source(CanonicalField::PrimerNombre), Some("nombre"));
        assert_eq!(editor.mapping().source(CanonicalField::SegundoNombre), Some("nombre"));
    }

    #[test]
    fn test_freeze_requires_validity() {
        assert!(matches!(editor().freeze(), Err(ImportError::InvalidMapping)));

        let mut editor = editor();
        editor
            .set_field(CanonicalField::Cedula, MappingTarget::Header("ci".to_string()))
            .unwrap();
        let frozen = editor.freeze().unwrap();
        assert_eq!(frozen.source(CanonicalField::Cedula), Some("ci"));
    }

    #[test]
    fn test_target_from_option() {
        assert_eq!(MappingTarget::from_option(None), MappingTarget::Unmapped);
        assert_eq!(MappingTarget::from_option(Some(String::new())), MappingTarget::Unmapped);
        assert_eq!(
            MappingTarget::from_option(Some("ci".into())),
            MappingTarget::Header("ci".into())
        );
    }
}
