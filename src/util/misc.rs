use std::fmt;

pub type Res<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub fn unixtime_now() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64 / 1000.0)
        .unwrap_or_default()
}

pub fn write_to_file(file_path: &str, data: &str) -> Res {
    use std::io::Write;
    let path = std::path::Path::new(file_path);
    let prefix = path.parent().ok_or("invalid path")?;
    std::fs::create_dir_all(prefix)?;
    let mut f = std::fs::File::create(path)?;
    write!(f, "{}", data)?;
    Ok(())
}

pub fn vec_to_string<T: fmt::Display>(v: &[T]) -> String {
    let vs: Vec<String> = v.iter().map(|x| format!("{}", x)).collect();
    "[".to_string() + &vs.join(", ") + "]"
}

// 最も数字の大きい値のindexから順に格納した配列を返却
// 同じ値が複数ある場合, 先に入っていた要素のindexが先になる
pub fn rank_by_index_vec<T: Ord>(v: &[T]) -> Vec<usize> {
    let mut i_n: Vec<(usize, &T)> = v.iter().enumerate().collect();
    i_n.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(&b.0)));
    i_n.iter().map(|e| e.0).collect()
}

// 値が大きい順に並べた時に各要素が何番目であるかを示す配列を返却
pub fn rank_by_rank_vec<T: Ord>(v: &[T]) -> Vec<usize> {
    let mut res = vec![0; v.len()];
    for (r, &i) in rank_by_index_vec(v).iter().enumerate() {
        res[i] = r;
    }
    res
}

#[test]
fn test_rank() {
    let v = [25000, 31000, 25000, 19000];
    assert_eq!(rank_by_index_vec(&v), vec![1, 0, 2, 3]);
    assert_eq!(rank_by_rank_vec(&v), vec![1, 0, 2, 3]);
    assert_eq!(vec_to_string(&v), "[25000, 31000, 25000, 19000]");
}
