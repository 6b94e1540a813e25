use std::str::FromStr;

use serde::{de, ser};

use super::*;

// 鳴きの記録用の牌 役や牌の整合性の判定には使用しない
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tile(pub Type, pub Tnum); // (type index, number index)

pub fn tile_type_from_char(ch: char) -> Result<Type, String> {
    match ch {
        'm' => Ok(TM),
        'p' => Ok(TP),
        's' => Ok(TS),
        'z' => Ok(TZ),
        _ => Err(format!("invalid tile type char: {ch}")),
    }
}

pub fn tile_type_to_char(ti: Type) -> char {
    ['m', 'p', 's', 'z'][ti % TYPE]
}

// "m123p55z7" のような表記を牌の配列に変換
pub fn tiles_from_string(exp: &str) -> Result<Vec<Tile>, String> {
    let mut tiles = vec![];
    let mut ti = None;
    for c in exp.chars() {
        match c {
            '0'..='9' => {
                let Some(t) = ti else {
                    return Err("tile number before tile type".to_string());
                };
                let ni = c.to_digit(10).unwrap_or_default() as Tnum;
                if t == TZ && !(1..=7).contains(&ni) {
                    return Err(format!("invalid honor number: {ni}"));
                }
                tiles.push(Tile(t, ni));
            }
            _ => ti = Some(tile_type_from_char(c)?),
        }
    }
    Ok(tiles)
}

pub fn tiles_to_string(tiles: &[Tile]) -> String {
    let mut res = String::new();
    let mut last = None;
    for t in tiles {
        if last != Some(t.0) {
            res.push(tile_type_to_char(t.0));
            last = Some(t.0);
        }
        res.push_str(&t.1.to_string());
    }
    res
}

impl FromStr for Tile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match tiles_from_string(s)?.as_slice() {
            [t] => Ok(*t),
            _ => Err(format!("invalid tile symbol: '{s}'")),
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", tile_type_to_char(self.0), self.1)
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl ser::Serialize for Tile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

struct TileVisitor;

impl de::Visitor<'_> for TileVisitor {
    type Value = Tile;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("tile symbol")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        v.parse().map_err(E::custom)
    }
}

impl<'de> de::Deserialize<'de> for Tile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_str(TileVisitor)
    }
}

#[test]
fn test_tiles_string() {
    let tiles = tiles_from_string("m123z77").unwrap();
    assert_eq!(tiles.len(), 5);
    assert_eq!(tiles[3], Tile(TZ, 7));
    assert_eq!(tiles_to_string(&tiles), "m123z77");
    assert!(tiles_from_string("1m").is_err());
    assert!(tiles_from_string("z8").is_err());
}

#[test]
fn test_tile_serde() {
    let t: Tile = serde_json::from_str("\"p5\"").unwrap();
    assert_eq!(t, Tile(TP, 5));
    assert_eq!(serde_json::to_string(&t).unwrap(), "\"p5\"");
}
