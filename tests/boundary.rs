//! Parser and validation boundary behaviors (§8): malformed mappings,
//! inside-out validation, blank-node promotion, and join-free Cartesian
//! products.

mod support;

use r2rml::generator::writer::NTriplesWriter;
use r2rml::generator::Generator;

#[test]
fn empty_mapping_is_valid_and_inside_out_valid() {
    let (mapping, _sink) = support::parse_mapping("");
    assert!(mapping.triples_maps.is_empty());
    assert!(mapping.is_valid());
    assert!(mapping.is_valid_inside_out());
}

#[test]
fn malformed_logical_table_predicate_yields_invalid_triples_map() {
    let turtle = r#"
        @prefix rr: <http://www.w3.org/ns/r2rml#> .

        <http://ex/Emp> rr:subjectMap [ rr:template "http://ex/{ID}" ] ;
            rr:table [ rr:tableName "EMP" ] .
    "#;
    let (mapping, _sink) = support::parse_mapping(turtle);
    assert_eq!(mapping.triples_maps.len(), 1);
    let tm = &mapping.triples_maps[0];
    assert!(tm.logical_table.is_none());
    assert!(!tm.is_valid());
    assert!(!mapping.is_valid());
}

#[test]
fn blank_node_subject_with_r2rml_predicates_is_not_promoted() {
    let turtle = r#"
        @prefix rr: <http://www.w3.org/ns/r2rml#> .

        [] rr:logicalTable [ rr:tableName "EMP" ] ;
           rr:subjectMap [ rr:template "http://ex/{ID}" ] .
    "#;
    let (mapping, _sink) = support::parse_mapping(turtle);
    assert!(mapping.triples_maps.is_empty());
}

#[test]
fn inside_out_validation_requires_no_logical_table_and_no_referencing_object_maps() {
    let turtle = r#"
        @prefix rr: <http://www.w3.org/ns/r2rml#> .

        <http://ex/Emp> rr:subjectMap [ rr:template "http://ex/{ID}" ] ;
            rr:predicateObjectMap [
                rr:predicate <http://ex/name> ;
                rr:objectMap [ rr:column "ENAME" ]
            ] .
    "#;
    let (mapping, _sink) = support::parse_mapping(turtle);
    assert!(!mapping.is_valid(), "no logical table, so isValid is false");
    assert!(
        mapping.is_valid_inside_out(),
        "no logical table and no referencing object maps satisfies inside-out validity"
    );
}

#[test]
fn zero_join_conditions_produce_cartesian_product() {
    let turtle = r#"
        @prefix rr: <http://www.w3.org/ns/r2rml#> .
        @prefix ex: <http://example.com/ns#> .

        <http://ex/Dept> rr:logicalTable [ rr:tableName "DEPT" ] ;
            rr:subjectMap [ rr:template "http://data.example.com/department/{DEPTNO}" ] .

        <http://ex/Emp> rr:logicalTable [ rr:tableName "EMP" ] ;
            rr:subjectMap [ rr:template "http://data.example.com/employee/{EMPNO}" ] ;
            rr:predicateObjectMap [
                rr:predicate ex:department ;
                rr:objectMap [ rr:parentTriplesMap <http://ex/Dept> ]
            ] .
    "#;
    let (mapping, sink) = support::parse_mapping(turtle);
    assert!(sink.diagnostics.is_empty());
    assert!(mapping.is_valid());

    let setup = "CREATE TABLE DEPT (DEPTNO TEXT);
                 INSERT INTO DEPT VALUES ('10'), ('20');
                 CREATE TABLE EMP (EMPNO TEXT);
                 INSERT INTO EMP VALUES ('7369');";
    let conn = support::seed_database(setup);

    let mut buf = Vec::new();
    {
        let mut writer = NTriplesWriter::new(&mut buf);
        Generator::new().generate(&mapping, &conn, &mut writer).unwrap();
    }
    let out = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = out.lines().filter(|l| !l.trim().is_empty()).collect();
    assert_eq!(lines.len(), 2, "every parent department row joins the single employee row");
    assert!(out.contains("<http://data.example.com/department/10>"));
    assert!(out.contains("<http://data.example.com/department/20>"));
}

#[test]
fn unresolved_parent_triples_map_is_reported_and_clears_reference() {
    let turtle = r#"
        @prefix rr: <http://www.w3.org/ns/r2rml#> .
        @prefix ex: <http://example.com/ns#> .

        <http://ex/Emp> rr:logicalTable [ rr:tableName "EMP" ] ;
            rr:subjectMap [ rr:template "http://ex/employee/{EMPNO}" ] ;
            rr:predicateObjectMap [
                rr:predicate ex:department ;
                rr:objectMap [ rr:parentTriplesMap <http://ex/MissingDept> ]
            ] .
    "#;
    let (mapping, sink) = support::parse_mapping(turtle);
    assert_eq!(sink.diagnostics.len(), 1);
    assert!(!mapping.is_valid(), "an unresolved parent makes the referencing object map invalid");
}
