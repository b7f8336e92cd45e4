use chrono::NaiveDate;

/// 純粋関数：延滞料金を計算する
///
/// ビジネスルール：
/// - `today > due` のとき `延滞日数 × 日額` を返す
/// - それ以外は「不在」（Noneであってゼロではない）
///
/// 不在とゼロの区別は重要。表示側は料金の有無で分岐するため、
/// 更新で期限が先送りされた貸出の料金は消えていなければならない。
pub fn compute_fine(due: NaiveDate, today: NaiveDate, rate_per_day: i64) -> Option<i64> {
    if today > due {
        Some((today - due).num_days() * rate_per_day)
    } else {
        None
    }
}
