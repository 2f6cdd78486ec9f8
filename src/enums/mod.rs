// Copyright (c) ScaleFS LLC; used with permission
// Licensed under the MIT License

mod class_devs_flags;
pub use class_devs_flags::ClassDevsFlags;
