use crate::model::*;

// 局番号から場風を決定 (1~16以外は東)
pub fn wind_for_round(round_number: u32) -> Wind {
    match round_number {
        1..=4 => Wind::East,
        5..=8 => Wind::South,
        9..=12 => Wind::West,
        13..=16 => Wind::North,
        _ => Wind::East,
    }
}

// 場風内での局数 (1~4)
#[inline]
pub fn round_number_within_wind(round_number: u32) -> u32 {
    (round_number as i64 - 1).rem_euclid(SEAT as i64) as u32 + 1
}

#[inline]
pub fn next_dealer(dealer: Seat, renchan: bool) -> Seat {
    next_dealer_in(dealer, SEAT, renchan)
}

pub fn next_dealer_in(dealer: Seat, seat_count: usize, renchan: bool) -> Seat {
    if renchan {
        dealer
    } else {
        (dealer + 1) % seat_count
    }
}

// 上家 (反時計回りに隣の座席)
#[inline]
pub fn upper_seat(target: Seat) -> Seat {
    (target + SEAT - 1) % SEAT
}

#[inline]
pub fn calc_seat_offset(base_seat: Seat, target_seat: Seat) -> Seat {
    (target_seat + SEAT - base_seat) % SEAT
}

// 自風
pub fn calc_seat_wind(dealer: Seat, seat: Seat) -> Wind {
    match calc_seat_offset(dealer, seat) {
        0 => Wind::East,
        1 => Wind::South,
        2 => Wind::West,
        _ => Wind::North,
    }
}

#[test]
fn test_wind_for_round() {
    for n in 1..=4 {
        assert_eq!(wind_for_round(n), Wind::East);
    }
    for n in 5..=8 {
        assert_eq!(wind_for_round(n), Wind::South);
    }
    for n in 9..=12 {
        assert_eq!(wind_for_round(n), Wind::West);
    }
    for n in 13..=16 {
        assert_eq!(wind_for_round(n), Wind::North);
    }
    assert_eq!(wind_for_round(0), Wind::East);
    assert_eq!(wind_for_round(17), Wind::East);
}

#[test]
fn test_round_number_within_wind() {
    assert_eq!(round_number_within_wind(1), 1);
    assert_eq!(round_number_within_wind(4), 4);
    assert_eq!(round_number_within_wind(5), 1);
    assert_eq!(round_number_within_wind(16), 4);
    assert_eq!(round_number_within_wind(0), 4);
}

#[test]
fn test_seat_rotation() {
    assert_eq!(next_dealer(0, false), 1);
    assert_eq!(next_dealer(3, false), 0);
    assert_eq!(next_dealer(2, true), 2);
    assert_eq!(next_dealer_in(2, 3, false), 0);
    assert_eq!(upper_seat(2), 1);
    assert_eq!(upper_seat(0), 3);
    assert_eq!(calc_seat_wind(1, 0), Wind::North);
    assert_eq!(calc_seat_wind(1, 3), Wind::West);
}
