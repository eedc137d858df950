use std::io::Write;
use std::path::{Path, PathBuf};

use glam::Vec2;

use space_invaders::entities::EnemyKind;
use space_invaders::level::*;

const MINIMAL_MAP: &str = r#"{
  "width": 2,
  "height": 2,
  "tilewidth": 32,
  "tileheight": 32,
  "type": "map",
  "layers": [
    { "type": "tilelayer", "name": "Background", "width": 2, "height": 2, "data": [1, 0, 0, 2] },
    { "type": "imagelayer", "name": "Sky" },
    {
      "type": "objectgroup",
      "name": "Enemies",
      "objects": [
        { "id": 1, "x": 64.0, "y": 32.0, "type": "0" },
        { "id": 2, "x": 128.0, "y": 32.0, "type": "3" }
      ]
    },
    {
      "type": "objectgroup",
      "name": "Decor",
      "objects": [ { "id": 3, "x": 0.0, "y": 0.0, "type": "tree" } ]
    }
  ]
}"#;

fn map_with_enemy(field: &str, value: &str) -> String {
    format!(
        r#"{{"width":1,"height":1,"tilewidth":32,"tileheight":32,"layers":[
            {{"type":"objectgroup","name":"Enemies","objects":[
                {{"id":7,"x":10,"y":20,"{field}":"{value}"}}
            ]}}
        ]}}"#
    )
}

fn manifest_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

// ── parsing ───────────────────────────────────────────────────────────────────

#[test]
fn parses_tiles_and_enemy_spawns() {
    let level = parse_level("minimal", MINIMAL_MAP).unwrap();

    assert_eq!(level.name, "minimal");
    assert_eq!(level.tile_size, Vec2::new(32.0, 32.0));
    assert_eq!((level.width_in_tiles, level.height_in_tiles), (2, 2));

    assert_eq!(level.tile_layers.len(), 1);
    let background = &level.tile_layers[0];
    assert_eq!(background.name, "Background");
    assert_eq!(background.tile_at(0, 0), 1);
    assert_eq!(background.tile_at(1, 1), 2);
    assert_eq!(background.tile_at(5, 0), 0);

    assert_eq!(
        level.enemy_spawns,
        vec![
            EnemySpawn {
                position: Vec2::new(64.0, 32.0),
                kind: EnemyKind::Scout,
            },
            EnemySpawn {
                position: Vec2::new(128.0, 32.0),
                kind: EnemyKind::Mothership,
            },
        ]
    );
}

#[test]
fn accepts_class_field_for_enemy_type() {
    let level = parse_level("class", &map_with_enemy("class", "2")).unwrap();
    assert_eq!(level.enemy_spawns.len(), 1);
    assert_eq!(level.enemy_spawns[0].kind, EnemyKind::Bomber);
    assert_eq!(level.enemy_spawns[0].position, Vec2::new(10.0, 20.0));
}

#[test]
fn non_numeric_enemy_type_is_rejected() {
    let err = parse_level("bad", &map_with_enemy("type", "boss")).unwrap_err();
    match err {
        LevelError::BadEnemyType {
            name,
            object_id,
            value,
        } => {
            assert_eq!(name, "bad");
            assert_eq!(object_id, 7);
            assert_eq!(value, "boss");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn out_of_range_enemy_type_is_rejected() {
    let err = parse_level("big", &map_with_enemy("type", "4")).unwrap_err();
    assert!(matches!(
        err,
        LevelError::UnknownEnemyType {
            object_id: 7,
            type_id: 4,
            ..
        }
    ));
}

#[test]
fn invalid_json_is_reported() {
    let err = parse_level("broken", "{ not json").unwrap_err();
    assert!(matches!(err, LevelError::Json { .. }));
    assert!(err.to_string().contains("broken"));
}

#[test]
fn map_without_enemy_group_has_no_spawns() {
    let json = r#"{"width":1,"height":1,"tilewidth":16,"tileheight":16,"layers":[]}"#;
    let level = parse_level("empty", json).unwrap();
    assert!(level.enemy_spawns.is_empty());
    assert!(level.tile_layers.is_empty());
}

// ── files ─────────────────────────────────────────────────────────────────────

#[test]
fn missing_level_file_is_io_error() {
    let err = load_level(Path::new("definitely/not/here.tmj")).unwrap_err();
    assert!(matches!(err, LevelError::Io { .. }));
}

#[test]
fn loads_level_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(MINIMAL_MAP.as_bytes()).unwrap();

    let level = load_level(file.path()).unwrap();
    assert_eq!(level.enemy_spawns.len(), 2);
    assert_eq!(level.name, file.path().display().to_string());
}

#[test]
fn bundled_levels_parse() {
    let first = load_level(&manifest_path("levels/level1.tmj")).unwrap();
    assert_eq!(first.enemy_spawns.len(), 15);
    assert_eq!(first.tile_size, Vec2::new(32.0, 32.0));

    let second = load_level(&manifest_path("levels/level2.tmj")).unwrap();
    assert_eq!(second.enemy_spawns.len(), 24);
}

// ── campaign ──────────────────────────────────────────────────────────────────

#[test]
fn campaign_wraps_around() {
    let a = parse_level("a", MINIMAL_MAP).unwrap();
    let b = parse_level("b", MINIMAL_MAP).unwrap();
    let campaign = Campaign::new(vec![a, b]);

    assert_eq!(campaign.len(), 2);
    assert_eq!(campaign.level(0).name, "a");
    assert_eq!(campaign.level(3).name, "b");
    assert_eq!(campaign.next_index(0), 1);
    assert_eq!(campaign.next_index(1), 0);
}

#[test]
fn empty_campaign_plays_procedural_wave() {
    let campaign = Campaign::new(Vec::new());
    assert_eq!(campaign.len(), 1);
    assert!(!campaign.is_empty());
    assert!(campaign.level(0).enemy_spawns.is_empty());
    assert_eq!(campaign.next_index(0), 0);
}

#[test]
fn campaign_load_fails_on_any_bad_file() {
    let paths = vec![
        manifest_path("levels/level1.tmj"),
        PathBuf::from("definitely/not/here.tmj"),
    ];
    assert!(Campaign::load(&paths).is_err());
}
