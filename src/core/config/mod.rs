//! Vehicle configuration record
//!
//! One flat record covering magnetometer calibration, GNSS/antenna
//! parameters, autopilot tuning, data-log settings, and the vehicle-class
//! sub-records. The record travels over the link as a single sequential
//! stream; see [`schema`] for the canonical field order shared by the
//! encoder and decoder.
//!
//! The record is owned by the protocol's configuration handler and mutated
//! only by the set-configuration command. Control-loop consumers read it
//! through [`crate::CommandDispatcher::config`].

use heapless::String;
use nalgebra::{Matrix3, Vector3};

pub mod schema;

pub use schema::FieldCodec;

/// Capacity of the embedded log name. Longer names are truncated on decode.
pub const LOG_NAME_MAX: usize = 32;

/// Magnetometer usage and calibration.
#[derive(Debug, Clone, PartialEq)]
pub struct MagConfig {
    pub enabled: bool,
    pub compensate: bool,
    /// Gain for feeding magnetometer yaw into the attitude filter.
    pub yaw_gain: f32,
    /// Hard-iron offset, subtracted from raw samples.
    pub offset: Vector3<f32>,
    /// Soft-iron correction matrix, applied after the offset.
    pub soft_iron: Matrix3<f32>,
}

impl Default for MagConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            compensate: true,
            yaw_gain: 1.0,
            offset: Vector3::zeros(),
            soft_iron: Matrix3::identity(),
        }
    }
}

/// GNSS receiver and antenna parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GnssConfig {
    /// Antenna offset from the vehicle reference point, metres.
    pub ant_x: f32,
    pub ant_y: f32,
    pub compensate: bool,
    pub require_rtk: bool,
    /// Use the RTCM base station position as the ENU reference.
    pub base_as_enu_ref: bool,
    pub corr_gain_stat: f32,
    pub corr_gain_dyn: f32,
    pub corr_gain_yaw: f32,
    /// Forward NMEA sentences over the radio link.
    pub send_nmea: bool,
    pub use_ubx_info: bool,
    pub ubx_max_acc: f32,
}

impl Default for GnssConfig {
    fn default() -> Self {
        Self {
            ant_x: 0.0,
            ant_y: 0.0,
            compensate: true,
            require_rtk: true,
            base_as_enu_ref: true,
            corr_gain_stat: 0.05,
            corr_gain_dyn: 0.05,
            corr_gain_yaw: 1.0,
            send_nmea: false,
            use_ubx_info: true,
            ubx_max_acc: 0.12,
        }
    }
}

/// Autopilot path-follow tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct ApConfig {
    pub repeat_routes: bool,
    /// Purest-pursuit base look-ahead radius, metres.
    pub base_rad: f32,
    pub rad_time_ahead: f32,
    pub mode_time: bool,
    pub max_speed: f32,
    pub time_add_repeat_ms: i32,
}

impl Default for ApConfig {
    fn default() -> Self {
        Self {
            repeat_routes: true,
            base_rad: 0.8,
            rad_time_ahead: 0.8,
            mode_time: false,
            max_speed: 8.3,
            time_add_repeat_ms: 60_000,
        }
    }
}

/// Data-log settings, pushed to the log collaborator on every update.
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub rate_hz: i16,
    pub enabled: bool,
    /// File name of the active log. ASCII; embedded mid-record on the wire
    /// as a sentinel-terminated byte run.
    pub name: String<LOG_NAME_MAX>,
    pub mode_ext: u8,
    pub uart_baud: u32,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            rate_hz: 20,
            enabled: false,
            name: String::new(),
            mode_ext: 0,
            uart_baud: 115_200,
        }
    }
}

/// Wheeled-vehicle parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CarConfig {
    pub yaw_use_odometry: bool,
    pub yaw_imu_gain: f32,
    pub disable_motor: bool,
    pub simulate_motor: bool,
    pub clamp_imu_yaw_stationary: bool,
    pub use_uwb_pos: bool,
    pub gear_ratio: f32,
    pub wheel_diam: f32,
    pub motor_poles: f32,
    pub steering_max_angle_rad: f32,
    pub steering_center: f32,
    pub steering_range: f32,
    pub steering_ramp_time: f32,
    /// Distance between front and rear axles, metres.
    pub axis_distance: f32,
}

impl Default for CarConfig {
    fn default() -> Self {
        Self {
            yaw_use_odometry: true,
            yaw_imu_gain: 0.5,
            disable_motor: false,
            simulate_motor: false,
            clamp_imu_yaw_stationary: true,
            use_uwb_pos: false,
            gear_ratio: 0.1,
            wheel_diam: 0.12,
            motor_poles: 4.0,
            steering_max_angle_rad: 0.42,
            steering_center: 0.5,
            steering_range: 0.58,
            steering_ramp_time: 0.6,
            axis_distance: 0.475,
        }
    }
}

/// Multirotor gain sets and motor layout.
#[derive(Debug, Clone, PartialEq)]
pub struct MultirotorConfig {
    pub vel_decay_e: f32,
    pub vel_decay_l: f32,
    pub vel_max: f32,
    pub map_min_x: f32,
    pub map_max_x: f32,
    pub map_min_y: f32,
    pub map_max_y: f32,
    pub vel_gain_p: f32,
    pub vel_gain_i: f32,
    pub vel_gain_d: f32,
    pub tilt_gain_p: f32,
    pub tilt_gain_i: f32,
    pub tilt_gain_d: f32,
    pub max_corr_error: f32,
    pub max_tilt_error: f32,
    pub ctrl_gain_roll_p: f32,
    pub ctrl_gain_roll_i: f32,
    pub ctrl_gain_roll_dp: f32,
    pub ctrl_gain_roll_de: f32,
    pub ctrl_gain_pitch_p: f32,
    pub ctrl_gain_pitch_i: f32,
    pub ctrl_gain_pitch_dp: f32,
    pub ctrl_gain_pitch_de: f32,
    pub ctrl_gain_yaw_p: f32,
    pub ctrl_gain_yaw_i: f32,
    pub ctrl_gain_yaw_dp: f32,
    pub ctrl_gain_yaw_de: f32,
    pub ctrl_gain_pos_p: f32,
    pub ctrl_gain_pos_i: f32,
    pub ctrl_gain_pos_d: f32,
    pub ctrl_gain_alt_p: f32,
    pub ctrl_gain_alt_i: f32,
    pub ctrl_gain_alt_d: f32,
    pub js_gain_tilt: f32,
    pub js_gain_yaw: f32,
    pub js_mode_rate: bool,
    /// Motor channel assignments, front-left/back-left/front-right/back-right.
    pub motor_fl_f: u8,
    pub motor_bl_l: u8,
    pub motor_fr_r: u8,
    pub motor_br_b: u8,
    /// X layout instead of plus layout.
    pub motors_x: bool,
    pub motors_cw: bool,
    pub motor_pwm_min_us: u16,
    pub motor_pwm_max_us: u16,
}

impl Default for MultirotorConfig {
    fn default() -> Self {
        Self {
            vel_decay_e: 0.8,
            vel_decay_l: 0.02,
            vel_max: 20.0,
            map_min_x: -500.0,
            map_max_x: 500.0,
            map_min_y: -500.0,
            map_max_y: 500.0,
            vel_gain_p: 0.1,
            vel_gain_i: 0.0,
            vel_gain_d: 0.1,
            tilt_gain_p: 0.2,
            tilt_gain_i: 0.0,
            tilt_gain_d: 0.05,
            max_corr_error: 0.5,
            max_tilt_error: 6.0,
            ctrl_gain_roll_p: 0.8,
            ctrl_gain_roll_i: 0.5,
            ctrl_gain_roll_dp: 0.25,
            ctrl_gain_roll_de: 0.1,
            ctrl_gain_pitch_p: 0.8,
            ctrl_gain_pitch_i: 0.5,
            ctrl_gain_pitch_dp: 0.25,
            ctrl_gain_pitch_de: 0.1,
            ctrl_gain_yaw_p: 3.0,
            ctrl_gain_yaw_i: 0.2,
            ctrl_gain_yaw_dp: 0.4,
            ctrl_gain_yaw_de: 0.2,
            ctrl_gain_pos_p: 0.6,
            ctrl_gain_pos_i: 0.02,
            ctrl_gain_pos_d: 0.8,
            ctrl_gain_alt_p: 0.1,
            ctrl_gain_alt_i: 0.1,
            ctrl_gain_alt_d: 0.14,
            js_gain_tilt: 1.0,
            js_gain_yaw: 0.6,
            js_mode_rate: false,
            motor_fl_f: 3,
            motor_bl_l: 2,
            motor_fr_r: 1,
            motor_br_b: 0,
            motors_x: true,
            motors_cw: false,
            motor_pwm_min_us: 1200,
            motor_pwm_max_us: 2000,
        }
    }
}

/// The complete configuration record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VehicleConfig {
    pub mag: MagConfig,
    pub gnss: GnssConfig,
    /// Largest position correction accepted from the UWB ranging system.
    pub uwb_max_corr: f32,
    pub ap: ApConfig,
    pub log: LogConfig,
    pub car: CarConfig,
    pub mr: MultirotorConfig,
}
