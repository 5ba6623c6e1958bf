//! Event codes found in `trk ` chunks.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(num_enum::TryFromPrimitive, num_enum::IntoPrimitive)]
#[repr(u8)]
pub enum TrackEventCode {
	/// Repeat the last silence.
	RepeatSilence = 0x90,
	/// Silence for a u8 duration.
	Silence = 0x92,
	/// Silence for a u16 duration.
	LongSilence = 0x93,
	/// Also used as padding.
	EndOfTrack = 0x98,
	LoopPointSet = 0x99,
	SetOctave = 0xA0,
	SetTempo = 0xA4,
	SetUnk1 = 0xA9,
	SetUnk2 = 0xAA,
	SetPreset = 0xAC,
	Modulate = 0xD7,
	SetUnk3 = 0xDB,
	SetTrkVol = 0xE0,
	SetExpress = 0xE3,
	SetTrkPan = 0xE8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackEvent {
	/// `0x01..=0x7F`: play a note. The code is the velocity.
	NoteOn(u8),
	/// `0x80..=0x8F`: wait before the next event. The low nibble indexes the delta-time table.
	DeltaTime(u8),
	Named(TrackEventCode),
	Unknown(u8),
}

pub fn classify(code: u8) -> TrackEvent {
	match code {
		0x01..=0x7F => TrackEvent::NoteOn(code),
		0x80..=0x8F => TrackEvent::DeltaTime(code & 0x0F),
		_ => match TrackEventCode::try_from(code) {
			Ok(named) => TrackEvent::Named(named),
			Err(_) => TrackEvent::Unknown(code),
		},
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use test_case::test_case;

	#[test_case(0x00, TrackEvent::Unknown(0x00))]
	#[test_case(0x01, TrackEvent::NoteOn(0x01))]
	#[test_case(0x7F, TrackEvent::NoteOn(0x7F))]
	#[test_case(0x80, TrackEvent::DeltaTime(0))]
	#[test_case(0x8F, TrackEvent::DeltaTime(15))]
	#[test_case(0x98, TrackEvent::Named(TrackEventCode::EndOfTrack))]
	#[test_case(0xE8, TrackEvent::Named(TrackEventCode::SetTrkPan))]
	#[test_case(0x91, TrackEvent::Unknown(0x91))]
	fn classify_codes(code: u8, event: TrackEvent) {
		assert_eq!(classify(code), event);
	}
}
