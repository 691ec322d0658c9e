use super::*;
use crate::{model::EntityKind, value::Value};

struct Article;

impl EntityKind for Article {
    const CODE_NAME: &'static str = "demo.article";
    const TABLE_NAME: &'static str = "Demo_Article";
}

#[test]
fn bare_query_selects_everything() {
    assert_eq!(SelectQuery::new("CMS_Tree").to_sql(), "SELECT * FROM [CMS_Tree]");
}

#[test]
fn filters_are_and_combined() {
    let sql = SelectQuery::new("Demo_Foo")
        .filter(Predicate::eq(Column::new("FooEnabled"), 1_i64))
        .filter(Predicate::ne(Column::new("FooName"), "x"))
        .to_sql();

    assert_eq!(
        sql,
        "SELECT * FROM [Demo_Foo] WHERE ([FooEnabled] = 1 AND [FooName] <> N'x')"
    );
}

#[test]
fn joins_and_ordering_render_in_clause_order() {
    let sql = SelectQuery::new("CMS_Tree")
        .columns([Column::qualified("CMS_Tree", "NodeID")])
        .inner_join(Join::inner(
            "CMS_Relationship",
            Predicate::column_eq(
                Column::qualified("CMS_Tree", "NodeID"),
                Column::qualified("CMS_Relationship", "RightNodeID"),
            ),
        ))
        .order_by_desc(Column::qualified("CMS_Relationship", "RelationshipOrder"))
        .order_by_asc(Column::new("NodeID"))
        .to_sql();

    assert_eq!(
        sql,
        "SELECT [CMS_Tree].[NodeID] FROM [CMS_Tree] \
         INNER JOIN [CMS_Relationship] ON [CMS_Tree].[NodeID] = [CMS_Relationship].[RightNodeID] \
         ORDER BY [CMS_Relationship].[RelationshipOrder] DESC, [NodeID] ASC"
    );
}

#[test]
fn in_list_renders_literals_and_collapses_singletons() {
    let many = Predicate::in_list(Column::new("BarID"), vec![Value::Int(1), Value::Int(2)]);
    let one = Predicate::in_list(Column::new("BarID"), vec![Value::Int(1)]);

    assert_eq!(render::predicate(&many), "[BarID] IN (1, 2)");
    assert_eq!(render::predicate(&one), "[BarID] = 1");
}

#[test]
fn empty_lists_and_junctions_render_identities() {
    assert_eq!(
        render::predicate(&Predicate::in_list(Column::new("X"), Vec::new())),
        "1 = 0"
    );
    assert_eq!(
        render::predicate(&Predicate::not_in(Column::new("X"), Vec::new())),
        "1 = 1"
    );
    assert_eq!(render::predicate(&Predicate::and(Vec::new())), "1 = 1");
    assert_eq!(render::predicate(&Predicate::or(Vec::new())), "1 = 0");
}

#[test]
fn exists_and_not_render_subqueries() {
    let pred = Predicate::not(Predicate::exists(
        "Demo_FooBar",
        Predicate::column_eq(
            Column::qualified("Demo_FooBar", "FooBarFooID"),
            Column::qualified("Demo_Foo", "FooID"),
        ) & Predicate::eq(Column::qualified("Demo_FooBar", "FooBarBarID"), 3_i64),
    ));

    assert_eq!(
        render::predicate(&pred),
        "NOT (EXISTS (SELECT 1 FROM [Demo_FooBar] WHERE \
         ([Demo_FooBar].[FooBarFooID] = [Demo_Foo].[FooID] AND [Demo_FooBar].[FooBarBarID] = 3)))"
    );
}

#[test]
fn brackets_are_escaped() {
    assert_eq!(bracket("odd]name"), "[odd]]name]");
}

#[test]
fn typed_query_uses_entity_table() {
    let query = TypedQuery::<Article>::new().filter(Predicate::eq(Column::new("ArticleID"), 4_i64));

    assert_eq!(query.code_name(), "demo.article");
    assert_eq!(
        query.to_sql(),
        "SELECT * FROM [Demo_Article] WHERE [ArticleID] = 4"
    );
    assert_eq!(query.into_inner().source(), "Demo_Article");
}

#[test]
fn multi_query_decorates_every_part() {
    let query = MultiQuery::new(["Demo_Article", "Demo_News"])
        .filter(Predicate::eq(Column::new("NodeID"), 1_i64))
        .order_by_asc(Column::new("NodeOrder"));

    assert_eq!(
        query.statements(),
        vec![
            "SELECT * FROM [Demo_Article] WHERE [NodeID] = 1 ORDER BY [NodeOrder] ASC".to_string(),
            "SELECT * FROM [Demo_News] WHERE [NodeID] = 1 ORDER BY [NodeOrder] ASC".to_string(),
        ]
    );
    assert_eq!(query.parts().len(), 2);
    assert!(query.to_sql().contains(";\nSELECT * FROM [Demo_News]"));
}
