// ==========================================
// 名册导入引擎 - 自动字段映射
// ==========================================
// 职责: 根据表头为每个规范字段提出初始映射
// 规则: 大小写不敏感；先精确匹配，再子串匹配；首个命中生效
// 说明: 同一表头可被多个字段占用（不互斥）
// ==========================================

use crate::domain::{CanonicalField, FieldMapping};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct AutoMapper;

impl AutoMapper {
    /// 按规范字段枚举顺序生成初始映射
    ///
    /// 未命中的字段不写入映射。
    pub fn propose(&self, headers: &[String]) -> FieldMapping {
        self.propose_for(&CanonicalField::ALL, headers)
    }

    /// 针对给定字段列表生成初始映射
    pub fn propose_for(&self, fields: &[CanonicalField], headers: &[String]) -> FieldMapping {
        let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
        let mut mapping = FieldMapping::new();

        for field in fields {
            if let Some(index) = self.match_header(field.name(), &lowered) {
                debug!(field = %field, header = %headers[index], "自动映射命中");
                mapping.set(*field, Some(headers[index].clone()));
            }
        }

        mapping
    }

    /// 返回命中表头的下标
    fn match_header(&self, field_name: &str, lowered_headers: &[String]) -> Option<usize> {
        let wanted = field_name.to_lowercase();

        lowered_headers
            .iter()
            .position(|h| *h == wanted)
            .or_else(|| lowered_headers.iter().position(|h| h.contains(&wanted)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_exact_match_preferred_over_partial() {
        let headers = strings(&["CedulaTutor", "Cedula", "Nombre1"]);
        let mapping = AutoMapper.propose(&headers);

        assert_eq!(mapping.source(CanonicalField::Cedula), Some("Cedula"));
    }

    #[test]
    fn test_exact_case_insensitive() {
        let headers = strings(&["Cedula", "Nombre1"]);
        let mapping = AutoMapper.propose(&headers);

        assert_eq!(mapping.source(CanonicalField::Cedula), Some("Cedula"));
        assert_eq!(mapping.source(CanonicalField::PrimerNombre), None);
    }

    #[test]
    fn test_substring_match_first_in_header_order() {
        let headers = strings(&["Sede Principal", "sede_anterior"]);
        let mapping = AutoMapper.propose(&headers);

        assert_eq!(mapping.source(CanonicalField::Sede), Some("Sede Principal"));
    }

    #[test]
    fn test_header_can_be_claimed_by_several_fields() {
        // "estatus_condicion" 同时包含 status 与 condicion
        let headers = strings(&["estatus_condicion"]);
        let mapping = AutoMapper.propose(&headers);

        assert_eq!(mapping.source(CanonicalField::Status), Some("estatus_condicion"));
        assert_eq!(mapping.source(CanonicalField::Condicion), Some("estatus_condicion"));
    }

    #[test]
    fn test_unmatched_fields_are_absent() {
        let headers = strings(&["primerNombre", "x"]);
        let mapping = AutoMapper.propose(&headers);

        assert_eq!(mapping.len(), 1);
        assert!(!mapping.contains_field(CanonicalField::Cedula));
    }

    #[test]
    fn test_mapping_order_follows_field_enumeration() {
        let headers = strings(&["carrera", "primerApellido", "cedula"]);
        let mapping = AutoMapper.propose(&headers);

        let fields: Vec<_> = mapping.fields().collect();
        assert_eq!(
            fields,
            vec![
                CanonicalField::Cedula,
                CanonicalField::PrimerApellido,
                CanonicalField::Carrera
            ]
        );
    }
}
