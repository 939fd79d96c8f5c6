mod fixtures;

mod codec_tests;
