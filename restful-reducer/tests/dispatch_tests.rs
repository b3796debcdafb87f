use pretty_assertions::assert_eq;
use restful_model::{Entity, EntitySchema, FieldSpec, Fields};
use restful_reducer::{
    ActionNames, ReducerConfig, ReducerError, ReducerSettings, Request, RestfulResource, Verb,
};
use serde_json::{Value, json};

fn fields(v: Value) -> Fields {
    match v {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

fn values(state: &[Entity]) -> Value {
    Value::Array(state.iter().cloned().map(Value::from).collect())
}

fn posts() -> RestfulResource<EntitySchema> {
    RestfulResource::new(EntitySchema::new(vec![
        FieldSpec::number("id"),
        FieldSpec::text("title"),
        FieldSpec::text("body"),
    ]))
}

// ── Verb ─────────────────────────────────────────────────────────

#[test]
fn verbs_parse_case_insensitively() {
    assert_eq!("get".parse::<Verb>().unwrap(), Verb::Get);
    assert_eq!("PATCH".parse::<Verb>().unwrap(), Verb::Patch);
    assert_eq!("Delete".parse::<Verb>().unwrap(), Verb::Delete);
}

#[test]
fn unknown_verb_is_rejected() {
    assert_eq!(
        "head".parse::<Verb>().unwrap_err(),
        ReducerError::UnknownVerb("head".into())
    );
}

#[test]
fn verb_display_and_idempotence() {
    assert_eq!(Verb::Put.to_string(), "put");
    assert!(!Verb::Post.is_idempotent());
    assert!(Verb::ALL.iter().filter(|v| v.is_idempotent()).count() == 4);
}

// ── Request ──────────────────────────────────────────────────────

#[test]
fn request_deserializes_with_defaults() {
    let r: Request = serde_json::from_value(json!({"verb": "delete", "params": {"id": 3}})).unwrap();
    assert_eq!(r, Request::delete(fields(json!({"id": 3}))));
    assert!(r.body.is_empty());
}

#[test]
fn request_parse_rejects_unknown_verb() {
    let err = Request::parse("options", Fields::new(), Fields::new()).unwrap_err();
    assert!(matches!(err, ReducerError::UnknownVerb(_)));
}

// ── Dispatch ─────────────────────────────────────────────────────

#[test]
fn apply_routes_every_verb() {
    let resource = posts();
    let s = resource
        .apply(&[], &Request::post(fields(json!({"title": "a", "body": "x"}))))
        .unwrap();
    let s = resource
        .apply(&s, &Request::post(fields(json!({"title": "b"}))))
        .unwrap();
    assert_eq!(
        values(&s),
        json!([{"id": 1, "title": "a", "body": "x"}, {"id": 2, "title": "b"}])
    );

    let s = resource
        .apply(&s, &Request::put(fields(json!({"id": 1})), fields(json!({"title": "A"}))))
        .unwrap();
    let s = resource
        .apply(&s, &Request::patch(fields(json!({"id": 2})), fields(json!({"body": "y"}))))
        .unwrap();
    assert_eq!(
        values(&s),
        json!([
            {"id": 1, "title": "A", "body": null},
            {"id": 2, "title": "b", "body": "y"}
        ])
    );

    let s = resource.apply(&s, &Request::delete(fields(json!({"id": 1})))).unwrap();
    let s = resource.apply(&s, &Request::get()).unwrap();
    assert_eq!(values(&s), json!([{"id": 2, "title": "b", "body": "y"}]));
}

#[test]
fn apply_surfaces_errors() {
    let resource = posts();
    let err = resource
        .apply(&[], &Request::patch(Fields::new(), fields(json!({"title": "x"}))))
        .unwrap_err();
    assert_eq!(err, ReducerError::MissingIdentity { key: "id".into() });
}

#[test]
fn resource_uses_bound_config() {
    let resource = RestfulResource::new(EntitySchema::new(vec![
        FieldSpec::number("num"),
        FieldSpec::text("title"),
    ]))
    .with_config(ReducerConfig::default().with_identity_key("num"));
    assert_eq!(resource.config().identity_key(), "num");

    let s = resource.create(&[], &fields(json!({"title": "a"}))).unwrap();
    assert_eq!(values(&s), json!([{"num": 1, "title": "a"}]));
}

// ── Action names ─────────────────────────────────────────────────

#[test]
fn prefixed_action_names_resolve() {
    let actions = ActionNames::prefixed("posts");
    assert_eq!(actions.name(Verb::Patch), "posts/patch");
    assert_eq!(actions.resolve("posts/get"), Some(Verb::Get));
    assert_eq!(actions.resolve("comments/get"), None);
}

#[test]
fn action_names_load_from_json() {
    let actions: ActionNames = serde_json::from_value(json!({
        "get": "FETCH_POSTS",
        "post": "CREATE_POST",
        "put": "REPLACE_POST",
        "patch": "UPDATE_POST",
        "delete": "DELETE_POST"
    }))
    .unwrap();
    assert_eq!(actions.resolve("UPDATE_POST"), Some(Verb::Patch));
}

#[test]
fn apply_action_routes_by_name() {
    let resource = posts().with_actions(ActionNames::prefixed("posts"));
    let s = resource
        .apply_action(&[], "posts/post", Fields::new(), fields(json!({"title": "a"})))
        .unwrap();
    assert_eq!(values(&s), json!([{"id": 1, "title": "a"}]));

    let err = resource
        .apply_action(&s, "posts/head", Fields::new(), Fields::new())
        .unwrap_err();
    assert_eq!(err, ReducerError::UnknownAction("posts/head".into()));
}

#[test]
fn apply_action_without_table_is_unknown() {
    let err = posts()
        .apply_action(&[], "posts/get", Fields::new(), Fields::new())
        .unwrap_err();
    assert!(matches!(err, ReducerError::UnknownAction(_)));
}

// ── Settings ─────────────────────────────────────────────────────

#[test]
fn settings_default_identity_key() {
    let settings: ReducerSettings = serde_json::from_value(json!({})).unwrap();
    assert_eq!(settings.identity_key, "id");
}

#[test]
fn settings_convert_into_config() {
    let settings: ReducerSettings = serde_json::from_value(json!({"identity_key": "num"})).unwrap();
    let config = ReducerConfig::from(settings);
    assert_eq!(config.identity_key(), "num");
}
