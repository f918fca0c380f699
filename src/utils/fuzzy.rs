//! 指令名稱的模糊比對，用於 "Did you mean ...?" 建議。

/// Levenshtein 編輯距離 (以字元計)
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// 相似度 0..=100
pub fn ratio(a: &str, b: &str) -> u32 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 100;
    }
    let distance = levenshtein_distance(a, b);
    let similarity = 1.0 - distance as f64 / max_len as f64;
    (similarity * 100.0).round() as u32
}

/// 將單字排序後再比對，讓 "contacts all" 能對上 "all contacts"
pub fn token_sort_ratio(a: &str, b: &str) -> u32 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<String> = s.split_whitespace().map(str::to_lowercase).collect();
    tokens.sort();
    tokens.join(" ")
}

pub fn score(input: &str, candidate: &str) -> u32 {
    let input = input.to_lowercase();
    ratio(&input, candidate).max(token_sort_ratio(&input, candidate))
}

/// 回傳分數最高的候選；同分時保留先出現者
pub fn best_match<'a, I>(input: &str, candidates: I) -> Option<(&'a str, u32)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, u32)> = None;
    for candidate in candidates {
        let s = score(input, candidate);
        if best.map_or(true, |(_, top)| s > top) {
            best = Some((candidate, s));
        }
    }
    best
}
